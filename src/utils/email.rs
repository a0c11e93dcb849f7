//! String-level helpers for email addresses. No DNS or SMTP work happens here.

/// True when `candidate` contains an `@` and the part after the last `@` contains a `.`.
pub fn has_address_shape(candidate: &str) -> bool {
    match candidate.rsplit_once('@') {
        Some((_, domain)) => domain.contains('.'),
        None => false,
    }
}

/// Splits a newline-delimited block of addresses, trimming each line and dropping blanks.
pub fn split_address_block(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_shape_requires_dot_after_last_at() {
        assert!(has_address_shape("user@example.com"));
        assert!(has_address_shape("odd@name@example.org"));
        assert!(!has_address_shape("user@localhost"));
        assert!(!has_address_shape("user.name.example.com"));
        assert!(!has_address_shape("first.last@host@nodot"));
        assert!(!has_address_shape(""));
    }

    #[test]
    fn address_block_drops_blank_lines() {
        let block = "a@x.com\n\n   \r\n  b@x.com  \nc@x.com\r\n";
        assert_eq!(
            split_address_block(block),
            vec!["a@x.com", "b@x.com", "c@x.com"]
        );
        assert!(split_address_block(" \n\t\n").is_empty());
    }
}
