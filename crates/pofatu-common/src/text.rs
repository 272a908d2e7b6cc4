//! Text helpers shared by the sheet reader and the entity builder.

/// Returns true for `None` and whitespace-only strings.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|text| text.trim().is_empty())
}

/// Trims a cell value, returning `None` when nothing is left.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Splits a `;`-delimited list, trimming items and dropping empty ones.
///
/// ```
/// use pofatu_common::semicolon_split;
///
/// assert_eq!(semicolon_split(Some("a; b;;c ")), vec!["a", "b", "c"]);
/// assert!(semicolon_split(None).is_empty());
/// ```
pub fn semicolon_split(value: Option<&str>) -> Vec<String> {
    let Some(text) = value else {
        return Vec::new();
    };
    text.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds an identifier from free text by keeping ASCII letters and digits.
///
/// Accented Latin letters are folded to their base letter first so that
/// `Nuku Hiva` and `Nukú Hiva` produce the same slug.
pub fn slug(value: &str, lowercase: bool) -> String {
    value
        .chars()
        .map(fold_accent)
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| {
            if lowercase {
                ch.to_ascii_lowercase()
            } else {
                ch
            }
        })
        .collect()
}

fn fold_accent(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' => 'A',
        'è' | 'é' | 'ê' | 'ë' | 'ē' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' => 'E',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' => 'I',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ō' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ō' => 'O',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("  ")));
        assert!(!is_blank(Some("x")));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  x ")), Some("x".to_string()));
        assert_eq!(non_empty(Some("   ")), None);
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Nuku Hiva / Hatiheu", true), "nukuhivahatiheu");
        assert_eq!(slug("Nukú Hiva", true), "nukuhiva");
        assert_eq!(slug("N-C", false), "NC");
        assert_eq!(slug("SiO2 [wt%]", true), "sio2wt");
    }
}
