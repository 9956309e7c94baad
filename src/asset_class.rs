//! Asset class taxonomy: the closed set of portfolio categories, their
//! canonical display order, and the classifier for free-text fund categories.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseAssetClassError;

/// Canonical portfolio category.
///
/// Declaration order is irrelevant; anything that needs a stable order
/// (reports, rounding tie-breaks) walks [`AssetClass::CANONICAL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AssetClass {
    Other,
    DomesticStocks,
    DomesticBonds,
    #[cfg_attr(feature = "serde", serde(rename = "domestic-reit"))]
    DomesticREIT,
    InternationalStocks,
    InternationalBonds,
    #[cfg_attr(feature = "serde", serde(rename = "international-reit"))]
    InternationalREIT,
    EmergingStocks,
    EmergingBonds,
    #[cfg_attr(feature = "serde", serde(rename = "emerging-reit"))]
    EmergingREIT,
    Balanced,
    Commodity,
    HedgeFund,
    BullBear,
}

impl AssetClass {
    /// Display and iteration order: stocks, bonds, REITs (each domestic,
    /// international, emerging), then the remaining categories, `Other` last.
    pub const CANONICAL: [AssetClass; 14] = [
        AssetClass::DomesticStocks,
        AssetClass::InternationalStocks,
        AssetClass::EmergingStocks,
        AssetClass::DomesticBonds,
        AssetClass::InternationalBonds,
        AssetClass::EmergingBonds,
        AssetClass::DomesticREIT,
        AssetClass::InternationalREIT,
        AssetClass::EmergingREIT,
        AssetClass::Balanced,
        AssetClass::Commodity,
        AssetClass::HedgeFund,
        AssetClass::BullBear,
        AssetClass::Other,
    ];

    /// Position of this class in [`AssetClass::CANONICAL`].
    pub fn canonical_rank(self) -> usize {
        // CANONICAL is exhaustive, so the fallback is never taken.
        Self::CANONICAL
            .iter()
            .position(|&c| c == self)
            .unwrap_or(Self::CANONICAL.len())
    }

    /// Stable kebab-case identifier used in config and target files.
    pub fn id(self) -> &'static str {
        match self {
            AssetClass::Other => "other",
            AssetClass::DomesticStocks => "domestic-stocks",
            AssetClass::DomesticBonds => "domestic-bonds",
            AssetClass::DomesticREIT => "domestic-reit",
            AssetClass::InternationalStocks => "international-stocks",
            AssetClass::InternationalBonds => "international-bonds",
            AssetClass::InternationalREIT => "international-reit",
            AssetClass::EmergingStocks => "emerging-stocks",
            AssetClass::EmergingBonds => "emerging-bonds",
            AssetClass::EmergingREIT => "emerging-reit",
            AssetClass::Balanced => "balanced",
            AssetClass::Commodity => "commodity",
            AssetClass::HedgeFund => "hedge-fund",
            AssetClass::BullBear => "bull-bear",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssetClass::Other => "Other",
            AssetClass::DomesticStocks => "Domestic Stocks",
            AssetClass::DomesticBonds => "Domestic Bonds",
            AssetClass::DomesticREIT => "Domestic REIT",
            AssetClass::InternationalStocks => "International Stocks",
            AssetClass::InternationalBonds => "International Bonds",
            AssetClass::InternationalREIT => "International REIT",
            AssetClass::EmergingStocks => "Emerging Stocks",
            AssetClass::EmergingBonds => "Emerging Bonds",
            AssetClass::EmergingREIT => "Emerging REIT",
            AssetClass::Balanced => "Balanced",
            AssetClass::Commodity => "Commodity",
            AssetClass::HedgeFund => "Hedge Fund",
            AssetClass::BullBear => "Bull/Bear",
        };
        f.pad(label)
    }
}

impl FromStr for AssetClass {
    type Err = ParseAssetClassError;

    /// Parses the kebab-case identifier returned by [`AssetClass::id`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AssetClass::CANONICAL
            .iter()
            .copied()
            .find(|c| c.id() == wanted)
            .ok_or_else(|| ParseAssetClassError(s.to_string()))
    }
}

/// Classification rules, evaluated top to bottom; the first rule with a
/// keyword contained in the description wins.
///
/// Japanese keywords are the broker's category labels. English keywords are
/// matched against the ASCII-lowercased description.
const RULES: &[(&[&str], AssetClass)] = &[
    (&["国内株式", "domestic stock"], AssetClass::DomesticStocks),
    (&["国内債券", "domestic bond"], AssetClass::DomesticBonds),
    (&["国内reit", "domestic reit"], AssetClass::DomesticREIT),
    (
        &["海外株式", "国際株式", "international stock", "foreign stock"],
        AssetClass::InternationalStocks,
    ),
    (
        &["海外債券", "国際債券", "international bond", "foreign bond"],
        AssetClass::InternationalBonds,
    ),
    (
        &["海外reit", "国際reit", "international reit", "foreign reit"],
        AssetClass::InternationalREIT,
    ),
    (&["新興国株式", "emerging stock"], AssetClass::EmergingStocks),
    (&["新興国債券", "emerging bond"], AssetClass::EmergingBonds),
    (&["新興国reit", "emerging reit"], AssetClass::EmergingREIT),
    (&["バランス", "balanced"], AssetClass::Balanced),
    (&["コモディティ", "commodit"], AssetClass::Commodity),
    (&["ヘッジファンド", "hedge fund"], AssetClass::HedgeFund),
    (&["ブル・ベア", "ブルベア", "bull/bear", "bull bear"], AssetClass::BullBear),
];

/// Map a free-text category description to an [`AssetClass`].
///
/// Total: anything no rule matches is [`AssetClass::Other`].
pub fn classify(description: &str) -> AssetClass {
    let normalized = description.to_ascii_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|&(_, class)| class)
        .unwrap_or(AssetClass::Other)
}
