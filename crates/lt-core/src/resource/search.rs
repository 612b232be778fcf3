use super::Hymn;

/// Case-insensitive match on title, or substring match on the hymn number.
pub fn filter_hymns<'a>(hymns: &'a [Hymn], term: &str) -> Vec<&'a Hymn> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return hymns.iter().collect();
    }

    hymns
        .iter()
        .filter(|h| {
            h.title.to_lowercase().contains(&needle) || h.number.to_string().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hymns() -> Vec<Hymn> {
        vec![
            Hymn {
                number: 1,
                title: "Chuvas de Graça".into(),
                lyrics: "x".into(),
            },
            Hymn {
                number: 15,
                title: "Conversão".into(),
                lyrics: "x".into(),
            },
            Hymn {
                number: 22,
                title: "Graça Sublime".into(),
                lyrics: "x".into(),
            },
        ]
    }

    #[test]
    fn matches_title_case_insensitively() {
        let hymns = hymns();
        let found: Vec<u32> = filter_hymns(&hymns, "GRAÇA").iter().map(|h| h.number).collect();
        assert_eq!(found, vec![1, 22]);
    }

    #[test]
    fn matches_number_substring() {
        let hymns = hymns();
        let found: Vec<u32> = filter_hymns(&hymns, "1").iter().map(|h| h.number).collect();
        assert_eq!(found, vec![1, 15]);
    }

    #[test]
    fn blank_term_returns_everything() {
        assert_eq!(filter_hymns(&hymns(), "  ").len(), 3);
    }
}
