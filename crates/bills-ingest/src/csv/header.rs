//! Header line parsing.

/// Normalizes a header cell: byte order mark and surrounding whitespace removed.
pub fn normalize_header(value: &str) -> String {
    value.trim_matches('\u{feff}').trim().to_string()
}

/// Splits a CSV header line into normalized column names, honouring quotes.
pub fn parse_header_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => {
                in_quotes = true;
            }
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ',' if !in_quotes => {
                fields.push(normalize_header(&current));
                current.clear();
            }
            _ => {
                current.push(c);
            }
        }
    }

    fields.push(normalize_header(&current));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff}ΔΙΑΔΡΟΜΗ"), "ΔΙΑΔΡΟΜΗ");
        assert_eq!(normalize_header("  ΟΦΕΙΛΗ "), "ΟΦΕΙΛΗ");
    }

    #[test]
    fn test_parse_header_line_greek() {
        let result = parse_header_line("ΑΡ.ΠΑΡΟΧΗΣ,ΚΥΒΙΚΑ 1,ΚΥΒ.3");
        assert_eq!(result, vec!["ΑΡ.ΠΑΡΟΧΗΣ", "ΚΥΒΙΚΑ 1", "ΚΥΒ.3"]);
    }

    #[test]
    fn test_parse_header_line_quoted() {
        let result = parse_header_line("\"ΔΙΕΥΘΥΝΣΗ, ΟΔΟΣ\",\"say \"\"hi\"\"\"");
        assert_eq!(result, vec!["ΔΙΕΥΘΥΝΣΗ, ΟΔΟΣ", "say \"hi\""]);
    }
}
