use unicode_normalization::UnicodeNormalization;

use super::CharFilter;

/// Supported Unicode normalization forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationForm {
    NFC,
    NFD,
    NFKC,
    NFKD,
}

/// A char filter that performs Unicode normalization.
///
/// With ASCII folding enabled every non-ASCII code point left after
/// normalization is dropped, so under NFKD `"ação"` becomes `"acao"`.
pub struct UnicodeNormalizationCharFilter {
    form: NormalizationForm,
    ascii_folding: bool,
}

impl UnicodeNormalizationCharFilter {
    pub fn new(form: NormalizationForm) -> Self {
        Self {
            form,
            ascii_folding: false,
        }
    }

    /// NFKD followed by ASCII folding, which strips diacritics.
    pub fn ascii_folding() -> Self {
        Self {
            form: NormalizationForm::NFKD,
            ascii_folding: true,
        }
    }
}

impl CharFilter for UnicodeNormalizationCharFilter {
    fn filter(&self, input: &str) -> String {
        let normalized: String = match self.form {
            NormalizationForm::NFC => input.nfc().collect(),
            NormalizationForm::NFD => input.nfd().collect(),
            NormalizationForm::NFKC => input.nfkc().collect(),
            NormalizationForm::NFKD => input.nfkd().collect(),
        };

        if self.ascii_folding {
            normalized.chars().filter(char::is_ascii).collect()
        } else {
            normalized
        }
    }

    fn name(&self) -> &'static str {
        if self.ascii_folding {
            "ascii_folding"
        } else {
            "unicode_normalization"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfc_normalization() {
        let filter = UnicodeNormalizationCharFilter::new(NormalizationForm::NFC);
        // "Amélie" where 'é' is decomposed (U+0065 U+0301)
        let output = filter.filter("Am\u{0065}\u{0301}lie");
        assert_eq!(output, "Am\u{00e9}lie");
    }

    #[test]
    fn test_ascii_folding_strips_diacritics() {
        let filter = UnicodeNormalizationCharFilter::ascii_folding();
        assert_eq!(filter.filter("ação você é"), "acao voce e");
        assert_eq!(filter.filter("Coração"), "Coracao");
    }

    #[test]
    fn test_ascii_folding_drops_unmappable() {
        let filter = UnicodeNormalizationCharFilter::ascii_folding();
        assert_eq!(filter.filter("ok 👍"), "ok ");
    }
}
