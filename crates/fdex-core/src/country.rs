//! Heuristic country classification for free-text location fields.
//!
//! The source database stores locality and province as unvalidated free text:
//! mixed Spanish/English/native spellings, abbreviations, country-code
//! prefixes ("D-12345 Berlin"), and whole addresses pasted into one field.
//! Classification is a two-step heuristic: an exact match against the known
//! Spanish province registry short-circuits to the home country, then an
//! ordered rule table is scanned for keyword/prefix/code hits. Rule order is
//! part of the contract — the first matching rule wins.

/// ISO-3166 alpha-2 code assumed when no other signal is found.
pub const HOME_COUNTRY: &str = "ES";

/// Known Spanish province names, accented and unaccented variants included.
///
/// Entries double as the canonical spelling used when a province name is
/// recovered from a locality field. Matching is case-insensitive but
/// accent-sensitive, so both variants of each accented name are listed.
pub const SPANISH_PROVINCES: &[&str] = &[
    "A Coruña",
    "Álava",
    "Albacete",
    "Alicante",
    "Almería",
    "Asturias",
    "Ávila",
    "Badajoz",
    "Baleares",
    "Barcelona",
    "Burgos",
    "Cáceres",
    "Cádiz",
    "Cantabria",
    "Castellón",
    "Ciudad Real",
    "Córdoba",
    "Cuenca",
    "Girona",
    "Granada",
    "Guadalajara",
    "Guipúzcoa",
    "Huelva",
    "Huesca",
    "Jaén",
    "La Rioja",
    "Las Palmas",
    "León",
    "Lleida",
    "Lugo",
    "Madrid",
    "Málaga",
    "Murcia",
    "Navarra",
    "Ourense",
    "Palencia",
    "Pontevedra",
    "Salamanca",
    "Santa Cruz de Tenerife",
    "Segovia",
    "Sevilla",
    "Soria",
    "Tarragona",
    "Teruel",
    "Toledo",
    "Valencia",
    "Valladolid",
    "Vizcaya",
    "Zamora",
    "Zaragoza",
    // Unaccented and alternative spellings observed in the database.
    "La Coruña",
    "Alava",
    "Almeria",
    "Avila",
    "Caceres",
    "Cadiz",
    "Cordoba",
    "Gerona",
    "Guipuzcoa",
    "Guipuzkoa",
    "Jaen",
    "Leon",
    "Lerida",
    "Malaga",
    "Canarias",
];

/// A single country's matching rule: keyword sets, locality prefixes, and
/// reserved province code tokens. All keywords are stored uppercased; inputs
/// are uppercased before matching.
#[derive(Debug, Clone, Copy)]
pub struct CountryRule {
    /// ISO-3166 alpha-2 code this rule resolves to.
    pub code: &'static str,
    /// Substrings matched against the province field.
    pub province_keywords: &'static [&'static str],
    /// Substrings matched against the locality field.
    pub locality_keywords: &'static [&'static str],
    /// Prefixes matched against the start of the locality field,
    /// e.g. postal conventions like "D-12345".
    pub locality_prefixes: &'static [&'static str],
    /// Tokens the province field must equal exactly (bare country codes
    /// occasionally stored in the province column).
    pub province_codes: &'static [&'static str],
}

impl CountryRule {
    fn matches(&self, province: &str, locality: &str) -> bool {
        self.province_keywords.iter().any(|k| province.contains(k))
            || self.locality_keywords.iter().any(|k| locality.contains(k))
            || self.locality_prefixes.iter().any(|p| locality.starts_with(p))
            || self.province_codes.iter().any(|c| province == *c)
    }
}

/// Ordered classification rules; earlier rules take precedence.
///
/// The order is a contract: a record matching several rules (e.g. a locality
/// naming two cities) resolves to the first hit, and reordering entries
/// changes classification outcomes.
pub const COUNTRY_RULES: &[CountryRule] = &[
    CountryRule {
        code: "PT",
        province_keywords: &["PORTUGAL", "LISBOA", "PORTO"],
        locality_keywords: &["PORTUGAL", "POVOA DE VARZIM", "AVEIRO"],
        locality_prefixes: &["P-"],
        province_codes: &[],
    },
    CountryRule {
        code: "FR",
        province_keywords: &["FRANCE", "FRANCIA", "PARIS"],
        locality_keywords: &[
            "PARIS",
            "LYON",
            "ST ANDRE DES EAUX",
            "ST NAZAIRE",
            "SAINT NAZAIRE",
            "LYN-FR",
        ],
        locality_prefixes: &["F-"],
        province_codes: &[],
    },
    CountryRule {
        code: "IT",
        province_keywords: &["ITALIA", "ITALY"],
        locality_keywords: &["ITALIA", "ROMA", "MILANO", "NAPOLI", "BOLOGNA", "ARGELATO"],
        locality_prefixes: &[],
        province_codes: &[],
    },
    CountryRule {
        code: "DE",
        province_keywords: &["ALEMANIA", "GERMANY", "DEUTSCHLAND"],
        locality_keywords: &[
            "BERLIN",
            "STUTTGART",
            "SUTTGART",
            "MÜNCHEN",
            "MUNICH",
            "HANNOVER",
            "CHEMNITZ",
            "IGERSHEIM",
            "SCHWETZINGEN",
            "MOERS",
            "LEIPZIG",
            "FRANKFURT",
            "MAINZ",
            "UNTERHACHING",
            "AACHEN",
            "ENGELSKIRCHEN",
            "BERGEN",
            " - GERMANY",
        ],
        locality_prefixes: &["D-"],
        province_codes: &[],
    },
    CountryRule {
        code: "GB",
        province_keywords: &[
            "REINO UNIDO",
            "UK",
            "ENGLAND",
            "GRAN BRETAÑA",
            "GREAT BRITAIN",
            "BRITISH",
            "BRITSH",
            "WALES",
        ],
        locality_keywords: &[
            "LONDON",
            "MANCHESTER",
            "DERBY",
            "CREWE",
            "STANMORE",
            "BRIDGEND",
            "WEST SUSSEX",
            "MIDDLESEX",
            "WALES",
        ],
        locality_prefixes: &[],
        province_codes: &["GB"],
    },
    CountryRule {
        code: "MA",
        province_keywords: &["MARRUECOS", "MOROCCO"],
        locality_keywords: &["CASABLANCA", "RABAT"],
        locality_prefixes: &[],
        province_codes: &[],
    },
    CountryRule {
        code: "CN",
        province_keywords: &["CHINA"],
        locality_keywords: &[
            "CHINA",
            "SHENZHEN",
            "GUANGDONG",
            "GUANGZHOU",
            "BEIJING",
            "DONGGUANG",
            "FUZHOU",
            "ANHUI",
            "GUAND DONG",
            "GUANDONG",
            "SHENZHENSHI",
            "ZHUAI",
            "ZHUHAI",
            ", CN",
            "-CN",
        ],
        locality_prefixes: &[],
        province_codes: &["CN"],
    },
    CountryRule {
        code: "BE",
        province_keywords: &["BELGIUM", "BELGICA"],
        locality_keywords: &["BELGIUM", "DIEGEM", "BRUSSELS", "BRUSELAS"],
        locality_prefixes: &[],
        province_codes: &[],
    },
    CountryRule {
        code: "NL",
        province_keywords: &["HOLANDA", "NETHERLANDS", "HOLLAND", "PAISES BAJOS"],
        locality_keywords: &["HOOFDDORP", "AMSTERDAM", "THE NETHERLANDS"],
        locality_prefixes: &[],
        province_codes: &[],
    },
    CountryRule {
        code: "CH",
        province_keywords: &["SUIZA", "SWITZERLAND"],
        locality_keywords: &["SWITZERLAND", "ZURICH", "GENEVA", "GINEBRA"],
        locality_prefixes: &[],
        province_codes: &[],
    },
    CountryRule {
        code: "TR",
        province_keywords: &["TURQUIA", "TURKEY"],
        locality_keywords: &["TURKEY", "ISTANBUL", "ANKARA"],
        locality_prefixes: &[],
        province_codes: &[],
    },
    CountryRule {
        code: "PL",
        province_keywords: &["POLONIA", "POLAND"],
        locality_keywords: &["POLONIA", "KRAKÓW", "KRAKOW", "WARSAW", "OLESNICA"],
        locality_prefixes: &[],
        province_codes: &["PL"],
    },
    CountryRule {
        code: "IE",
        province_keywords: &["IRLANDA", "IRELAND"],
        locality_keywords: &["IRELAND", "DUBLIN", "SANDYFORD", "(IE)"],
        locality_prefixes: &[],
        province_codes: &["IE"],
    },
    CountryRule {
        code: "US",
        province_keywords: &["ESTADOS UNIDOS", "UNITED STATES", "USA", "US"],
        locality_keywords: &["UNITED STATES", "USA", "CALIFORNIA", "SACRAMENTO", ", US"],
        locality_prefixes: &[],
        province_codes: &[],
    },
    CountryRule {
        code: "KR",
        province_keywords: &["COREA", "KOREA"],
        locality_keywords: &["SEOUL", "KOREA"],
        locality_prefixes: &[],
        province_codes: &[],
    },
    CountryRule {
        code: "HK",
        province_keywords: &["HONG KONG"],
        locality_keywords: &["HONG KONG", "KOWLOON"],
        locality_prefixes: &[],
        province_codes: &[],
    },
    CountryRule {
        code: "BG",
        province_keywords: &["BULGARIA"],
        locality_keywords: &["SOFIA", "BULGARIA"],
        locality_prefixes: &[],
        province_codes: &["BG"],
    },
    CountryRule {
        code: "LV",
        province_keywords: &["LETONIA", "LATVIA"],
        locality_keywords: &["LETONIA", "RIGA"],
        locality_prefixes: &[],
        province_codes: &[],
    },
    CountryRule {
        code: "DZ",
        province_keywords: &["ARGELIA", "ALGERIA"],
        locality_keywords: &["ARGEL", "ALGIERS"],
        locality_prefixes: &[],
        province_codes: &[],
    },
    CountryRule {
        code: "AD",
        province_keywords: &["ANDORRA"],
        locality_keywords: &["ANDORRA", "ESCALDES-ENGORDANY"],
        locality_prefixes: &[],
        province_codes: &[],
    },
];

/// Detect the country of a record from its raw province/locality text.
///
/// Always returns a valid 2-letter code; unrecognized or empty input falls
/// back to [`HOME_COUNTRY`]. A province that exactly matches a registry entry
/// resolves to the home country before any rule is scanned, so Spanish
/// provinces sharing a name with a foreign city cannot be misclassified.
#[must_use]
pub fn classify(province: Option<&str>, locality: Option<&str>) -> &'static str {
    let province = province.unwrap_or("").trim().to_uppercase();
    let locality = locality.unwrap_or("").trim().to_uppercase();

    if province.is_empty() && locality.is_empty() {
        return HOME_COUNTRY;
    }

    if is_registry_province(&province) {
        return HOME_COUNTRY;
    }

    for rule in COUNTRY_RULES {
        if rule.matches(&province, &locality) {
            return rule.code;
        }
    }

    HOME_COUNTRY
}

/// Returns true if `province_upper` (already uppercased and trimmed) exactly
/// matches a registry entry.
pub(crate) fn is_registry_province(province_upper: &str) -> bool {
    SPANISH_PROVINCES
        .iter()
        .any(|p| p.to_uppercase() == province_upper)
}

/// Returns the canonical registry spelling of the first province name found
/// as a substring of `locality`, case-insensitively.
pub(crate) fn registry_province_in(locality: &str) -> Option<&'static str> {
    let locality_upper = locality.to_uppercase();
    SPANISH_PROVINCES
        .iter()
        .find(|p| locality_upper.contains(&p.to_uppercase()))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_default_to_home_country() {
        assert_eq!(classify(None, None), "ES");
        assert_eq!(classify(Some(""), Some("")), "ES");
        assert_eq!(classify(Some("   "), Some("\t")), "ES");
    }

    #[test]
    fn always_returns_a_two_letter_code() {
        let inputs = [
            None,
            Some(""),
            Some("   "),
            Some("!!!???"),
            Some("ZZZZZZZZ"),
        ];
        for province in inputs {
            for locality in inputs {
                let code = classify(province, locality);
                assert_eq!(code.len(), 2, "classify({province:?}, {locality:?})");
            }
        }
    }

    #[test]
    fn tolerates_very_long_input() {
        let long = "X".repeat(10_000);
        assert_eq!(classify(Some(&long), Some(&long)), "ES");
    }

    #[test]
    fn every_registry_province_classifies_as_home() {
        for province in SPANISH_PROVINCES {
            assert_eq!(classify(Some(province), None), "ES", "province {province}");
            assert_eq!(
                classify(Some(&province.to_lowercase()), None),
                "ES",
                "lowercased province {province}"
            );
        }
    }

    #[test]
    fn registry_match_ignores_surrounding_whitespace() {
        assert_eq!(classify(Some("  Madrid  "), None), "ES");
    }

    #[test]
    fn registry_fast_path_beats_keyword_scan() {
        // "León" stays Spanish even with a foreign-looking locality alongside.
        assert_eq!(classify(Some("León"), Some("BERLIN")), "ES");
    }

    #[test]
    fn keyword_in_locality_detects_germany() {
        assert_eq!(classify(None, Some("BERLIN")), "DE");
        assert_eq!(classify(None, Some("berlin")), "DE");
    }

    #[test]
    fn keyword_in_province_detects_portugal() {
        assert_eq!(classify(Some("Lisboa"), None), "PT");
        assert_eq!(classify(Some("distrito de PORTO"), None), "PT");
    }

    #[test]
    fn locality_prefixes_detect_postal_conventions() {
        assert_eq!(classify(None, Some("D-12345 SOMECITY")), "DE");
        assert_eq!(classify(None, Some("F-75000 PARIS")), "FR");
        assert_eq!(classify(None, Some("P-4490 Povoa")), "PT");
    }

    #[test]
    fn bare_country_codes_in_province_match_exactly() {
        assert_eq!(classify(Some("GB"), None), "GB");
        assert_eq!(classify(Some("CN"), None), "CN");
        assert_eq!(classify(Some("PL"), None), "PL");
        assert_eq!(classify(Some("BG"), None), "BG");
        assert_eq!(classify(Some("IE"), None), "IE");
    }

    #[test]
    fn bare_code_must_be_the_whole_province() {
        // "GB" as a substring of a longer token is not the reserved-code path;
        // "RUGBY" matches nothing and falls through to the default.
        assert_eq!(classify(Some("RUGBY"), None), "ES");
    }

    #[test]
    fn rule_order_breaks_ties() {
        // France precedes Germany in the table, so a locality naming both
        // cities resolves to FR.
        assert_eq!(classify(None, Some("PARIS BERLIN")), "FR");
        // Portugal precedes France.
        assert_eq!(classify(Some("PORTUGAL"), Some("PARIS")), "PT");
    }

    #[test]
    fn accented_keywords_match() {
        assert_eq!(classify(None, Some("München")), "DE");
        assert_eq!(classify(None, Some("Kraków")), "PL");
        assert_eq!(classify(Some("Gran Bretaña"), None), "GB");
    }

    #[test]
    fn assorted_real_world_samples() {
        assert_eq!(classify(None, Some("SHENZHEN CITY")), "CN");
        assert_eq!(classify(None, Some("Sandyford, Dublin 18")), "IE");
        assert_eq!(classify(Some("Reino Unido"), None), "GB");
        assert_eq!(classify(None, Some("ESCALDES-ENGORDANY")), "AD");
        assert_eq!(classify(None, Some("HOOFDDORP")), "NL");
        assert_eq!(classify(None, Some("Sacramento, US")), "US");
    }

    #[test]
    fn classification_is_deterministic_across_calls() {
        let first = classify(Some("ITALIA"), Some("ROMA"));
        for _ in 0..5 {
            assert_eq!(classify(Some("ITALIA"), Some("ROMA")), first);
        }
        assert_eq!(first, "IT");
    }
}
