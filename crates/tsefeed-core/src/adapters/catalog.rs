//! Static lookup tables: market indices, industry indices and TGJU currencies.

use crate::domain::{normalize_symbol, Instrument, InstrumentKind};
use crate::ValidationError;

struct IndexEntry {
    code: &'static str,
    label: &'static str,
    names: &'static [&'static str],
}

const INDICES: &[IndexEntry] = &[
    IndexEntry {
        code: "32097828799138957",
        label: "Overall Index",
        names: &["شاخص کل"],
    },
    IndexEntry {
        code: "67130298613737946",
        label: "Total Equal Weighted Index",
        names: &["شاخص هم وزن", "شاخص کل هم وزن", "شاخص هموزن", "شاخص کل هموزن"],
    },
    IndexEntry {
        code: "5798407779416661",
        label: "Total Price Index",
        names: &["شاخص قیمت وزنی-ارزشی"],
    },
    IndexEntry {
        code: "8384385859414435",
        label: "Equal Weighted Price Index",
        names: &["شاخص قیمت هم وزن", "شاخص قیمت هموزن"],
    },
    IndexEntry {
        code: "49579049405614711",
        label: "Free Float Index",
        names: &["شاخص شناور آزاد", "شاخص شناور"],
    },
    IndexEntry {
        code: "62752761908615603",
        label: "OTC Main Board Index",
        names: &["شاخص بازار اول"],
    },
    IndexEntry {
        code: "71704845530629737",
        label: "OTC Secondary Board Index",
        names: &["شاخص بازار دوم"],
    },
    IndexEntry {
        code: "43754960038275285",
        label: "Industry Index",
        names: &["شاخص صنعت"],
    },
    IndexEntry {
        code: "10523825119011581",
        label: "Top 30 Index",
        names: &["شاخص 30 شرکت بزرگ", "شاخص سی شرکت بزرگ"],
    },
    IndexEntry {
        code: "46342955726788357",
        label: "Top 50 Index",
        names: &[
            "شاخص 50 شرکت فعال",
            "شاخص پنجاه شرکت فعال",
            "شاخص 50 شرکت فعال بورس",
            "شاخص پنجاه شرکت فعال بورس",
        ],
    },
];

const INDUSTRIES: &[(&str, &str)] = &[
    ("32453344048876642", "Basic Metals"),
    ("70077233737515808", "Cement"),
    ("20213770409093165", "Automobile"),
    ("33626672012415176", "Chemical"),
    ("24733701189547084", "Communication"),
    ("25163959460949732", "Other Financial"),
    ("59288237226302898", "Textiles"),
    ("57616105980228781", "Tile and Ceramic"),
    ("25766336681098389", "Publishing"),
    ("62691002126902464", "Mines"),
    ("69306841376553334", "Leather Products"),
];

/// A TGJU market indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    /// English key accepted on input.
    pub key: &'static str,
    /// TGJU indicator slug.
    pub slug: &'static str,
    /// Persian name used as the ticker label.
    pub persian: &'static str,
}

pub const CURRENCIES: &[Currency] = &[
    Currency { key: "dollar", slug: "price_dollar_rl", persian: "دلار" },
    Currency { key: "euro", slug: "price_eur", persian: "یورو" },
    Currency { key: "pound", slug: "price_gbp", persian: "پوند" },
    Currency { key: "dirham", slug: "price_aed", persian: "درهم" },
    Currency { key: "lira", slug: "price_try", persian: "لیر" },
    Currency { key: "yuan", slug: "price_cny", persian: "یوان" },
    Currency { key: "emami", slug: "sekee", persian: "سکه امامی" },
    Currency { key: "bahar", slug: "sekeb", persian: "سکه بهار آزادی" },
    Currency { key: "half", slug: "nim", persian: "نیم سکه" },
    Currency { key: "quarter", slug: "rob", persian: "ربع سکه" },
    Currency { key: "gerami", slug: "gerami", persian: "سکه گرمی" },
    Currency { key: "gold18", slug: "geram18", persian: "طلای 18 عیار" },
];

/// Index names are matched with ASCII digits and without half-spaces, so "شاخص ۳۰ شرکت
/// بزرگ" and "شاخص کل هم‌وزن" resolve too.
fn catalog_key(name: &str) -> String {
    crate::calendar::normalize_digits(&name.replace('\u{200c}', " "))
}

/// Looks up a well-known market index by its Persian name.
pub fn find_index(name: &str) -> Option<Instrument> {
    let key = normalize_symbol(&catalog_key(name)).ok()?;
    INDICES
        .iter()
        .find(|entry| entry.names.iter().any(|candidate| *candidate == key))
        .map(|entry| Instrument::new(entry.code, InstrumentKind::Index, entry.label))
}

/// Looks up an industry index by its English name, case-insensitively.
pub fn find_industry(name: &str) -> Option<Instrument> {
    let wanted = name.trim();
    INDUSTRIES
        .iter()
        .find(|(_, label)| label.eq_ignore_ascii_case(wanted))
        .map(|(code, label)| Instrument::new(*code, InstrumentKind::Industry, *label))
}

/// Resolves a currency by English key or Persian name.
pub fn find_currency(name: &str) -> Result<Currency, ValidationError> {
    let wanted = name.trim();
    let persian = normalize_symbol(&catalog_key(wanted)).unwrap_or_default();
    CURRENCIES
        .iter()
        .find(|c| c.key.eq_ignore_ascii_case(wanted) || c.persian == persian)
        .copied()
        .ok_or_else(|| ValidationError::UnknownCurrency {
            value: wanted.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_index_aliases() {
        let overall = find_index("شاخص کل").expect("known index");
        assert_eq!(overall.code, "32097828799138957");
        assert_eq!(overall.kind, InstrumentKind::Index);

        let equal = find_index("شاخص کل هم\u{200c}وزن").expect("half-space alias");
        assert_eq!(equal.code, "67130298613737946");

        let top30 = find_index("شاخص ۳۰ شرکت بزرگ").expect("persian digits alias");
        assert_eq!(top30.label, "Top 30 Index");

        assert!(find_index("فولاد").is_none());
    }

    #[test]
    fn resolves_industries_by_english_name() {
        let cement = find_industry("cement").expect("known industry");
        assert_eq!(cement.code, "70077233737515808");
        assert_eq!(cement.kind, InstrumentKind::Industry);
        assert_eq!(find_industry("MINES").expect("known industry").label, "Mines");
    }

    #[test]
    fn resolves_currencies_in_both_languages() {
        assert_eq!(find_currency("Dollar").expect("known").slug, "price_dollar_rl");
        assert_eq!(find_currency("سکه امامی").expect("known").slug, "sekee");
        assert!(matches!(
            find_currency("bitcoin"),
            Err(ValidationError::UnknownCurrency { .. })
        ));
    }
}
