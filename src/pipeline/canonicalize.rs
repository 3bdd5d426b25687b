use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::PipelineConfig;

static PAREN_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s\(.*\)").unwrap());
static PAREN_DESCRIPTOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((.*?)\)").unwrap());

/// Resolves raw display names into fetch slugs and canonical identifiers.
///
/// The alias table always wins: it encodes the exceptions where the generic
/// rules would produce a colliding or game-incorrect name (mega evolutions,
/// regional variants, gender-split species sharing a base name).
pub struct NameCanonicalizer<'a> {
    config: &'a PipelineConfig,
}

impl<'a> NameCanonicalizer<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Display name with any trailing parenthetical form descriptor removed.
    pub fn base_name(raw_name: &str) -> String {
        PAREN_SUFFIX.replace(raw_name, "").into_owned()
    }

    /// The parenthetical form descriptor, if the name carries one.
    pub fn form_descriptor(raw_name: &str) -> Option<String> {
        PAREN_DESCRIPTOR
            .captures(raw_name)
            .map(|c| c[1].to_string())
    }

    /// Fetch-safe slug for URL construction. Always the generic rules on the
    /// base name; the alias table never affects retrieval.
    pub fn fetch_slug(raw_name: &str) -> String {
        Self::generic_slug(&Self::base_name(raw_name))
    }

    /// Final canonical identifier. An exact alias match on the full raw name
    /// (parenthetical included) wins outright. Otherwise the generic rules
    /// apply to the base name, and a parenthetical descriptor with no alias
    /// contributes a qualifying suffix: same-dex index variants ("Venusaur"
    /// next to "Venusaur (Mega Venusaur)") must never collapse onto one key.
    pub fn canonical_name(&self, raw_name: &str) -> String {
        if let Some(alias) = self.config.alias_for(raw_name) {
            return alias.to_string();
        }
        let base = Self::base_name(raw_name);
        let base_slug = Self::generic_slug(&base);
        match Self::form_descriptor(raw_name) {
            Some(descriptor) => {
                let qualifier = Self::descriptor_qualifier(&descriptor, &base);
                if qualifier.is_empty() {
                    base_slug
                } else {
                    format!("{}-{}", base_slug, qualifier)
                }
            }
            None => base_slug,
        }
    }

    /// Slugged remainder of a form descriptor once the base name's words and
    /// the filler words "Form"/"Forme" are dropped: "Mega Venusaur" on
    /// Venusaur yields "mega", "Attack Forme" on Deoxys yields "attack".
    fn descriptor_qualifier(descriptor: &str, base: &str) -> String {
        let base_words: Vec<String> = base
            .split_whitespace()
            .map(|word| word.to_lowercase())
            .collect();
        let kept: Vec<&str> = descriptor
            .split_whitespace()
            .filter(|word| {
                let lower = word.to_lowercase();
                !base_words.contains(&lower) && lower != "form" && lower != "forme"
            })
            .collect();
        Self::generic_slug(&kept.join(" "))
    }

    /// Generic transliteration: gender glyphs become `-f`/`-m` suffixes,
    /// known accents are flattened, anything outside letters/digits/space/
    /// hyphen is dropped, spaces become hyphens, and the result is lowercase.
    /// Idempotent for any already-slugged input.
    pub fn generic_slug(name: &str) -> String {
        let mut slug = String::with_capacity(name.len());
        for ch in name.chars() {
            match ch {
                '♀' => slug.push_str("-f"),
                '♂' => slug.push_str("-m"),
                'é' | 'É' => slug.push('e'),
                ' ' => slug.push('-'),
                c if c.is_ascii_alphanumeric() || c == '-' => {
                    slug.push(c.to_ascii_lowercase())
                }
                _ => {}
            }
        }
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonicalizer(config: &PipelineConfig) -> NameCanonicalizer<'_> {
        NameCanonicalizer::new(config)
    }

    #[test]
    fn test_generic_slug_rules() {
        assert_eq!(NameCanonicalizer::generic_slug("Bulbasaur"), "bulbasaur");
        assert_eq!(NameCanonicalizer::generic_slug("Nidoran♀"), "nidoran-f");
        assert_eq!(NameCanonicalizer::generic_slug("Nidoran♂"), "nidoran-m");
        assert_eq!(NameCanonicalizer::generic_slug("Flabébé"), "flabebe");
        assert_eq!(NameCanonicalizer::generic_slug("Mr. Mime"), "mr-mime");
        assert_eq!(NameCanonicalizer::generic_slug("Farfetch'd"), "farfetchd");
        assert_eq!(NameCanonicalizer::generic_slug("Ho-Oh"), "ho-oh");
    }

    #[test]
    fn test_generic_slug_is_idempotent() {
        for name in ["Mr. Mime", "Nidoran♀", "Flabébé", "Tapu Koko"] {
            let once = NameCanonicalizer::generic_slug(name);
            assert_eq!(NameCanonicalizer::generic_slug(&once), once);
        }
    }

    #[test]
    fn test_alias_precedes_generic_rules() {
        let config = PipelineConfig::embedded().unwrap();
        let canon = canonicalizer(&config);
        assert_eq!(canon.canonical_name("Tatsugiri (Curly Form)"), "Tatsugiri");
        assert_eq!(
            canon.canonical_name("Tatsugiri (Droopy Form)"),
            "Tatsugiri-Droopy"
        );
        // Never the generic-rule result.
        assert_ne!(
            canon.canonical_name("Tatsugiri (Curly Form)"),
            "tatsugiri-curly-form"
        );
    }

    #[test]
    fn test_non_aliased_name_falls_through() {
        let config = PipelineConfig::embedded().unwrap();
        let canon = canonicalizer(&config);
        assert_eq!(canon.canonical_name("Pikachu"), "pikachu");
        assert_eq!(
            canon.canonical_name("Mr. Mime (Galarian Mr. Mime)"),
            "mr-mime-galarian"
        );
    }

    #[test]
    fn test_unaliased_variants_get_distinct_names() {
        let config = PipelineConfig::embedded().unwrap();
        let canon = canonicalizer(&config);
        // Index variants share a dex number; their canonical names must not
        // collapse onto the base key.
        assert_eq!(canon.canonical_name("Venusaur"), "venusaur");
        assert_eq!(
            canon.canonical_name("Venusaur (Mega Venusaur)"),
            "venusaur-mega"
        );
        assert_eq!(
            canon.canonical_name("Vulpix (Alolan Vulpix)"),
            "vulpix-alolan"
        );
        assert_eq!(canon.canonical_name("Deoxys (Attack Forme)"), "deoxys-attack");
    }

    #[test]
    fn test_fetch_slug_ignores_aliases() {
        // The alias renames the output key, never the retrieval URL.
        assert_eq!(
            NameCanonicalizer::fetch_slug("Tatsugiri (Curly Form)"),
            "tatsugiri"
        );
        assert_eq!(NameCanonicalizer::fetch_slug("Rotom (Heat Rotom)"), "rotom");
    }

    #[test]
    fn test_form_descriptor_extraction() {
        assert_eq!(
            NameCanonicalizer::form_descriptor("Deoxys (Attack Forme)"),
            Some("Attack Forme".to_string())
        );
        assert_eq!(NameCanonicalizer::form_descriptor("Deoxys"), None);
    }
}
