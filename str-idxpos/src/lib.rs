use line_col::LineColLookup;

/// Map index to position (line, column)
///
/// Line and column are zero based. Indexes past the end of the source map
/// to the position just after the last character.
pub fn index_to_position(source: &str, index: usize) -> (usize, usize) {
    let lookup = LineColLookup::new(source);

    let (line, char) = lookup.get(index.min(source.len()));

    (line - 1, char - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_map_the_first_index() {
        assert_eq!((0, 0), index_to_position("{{ x }}", 0));
    }

    #[test]
    fn it_should_map_an_index_on_a_later_line() {
        let source = "<ul>\n{% for x in xs %}\n  <li>{{ x }}</li>\n{% endfor %}";

        assert_eq!((2, 6), index_to_position(source, 29));
    }

    #[test]
    fn it_should_map_an_index_after_a_newline() {
        let source = "a\n{% if b %}";

        assert_eq!((1, 0), index_to_position(source, 2));
    }

    #[test]
    fn it_should_clamp_past_the_end() {
        let source = "ab";

        assert_eq!((0, 2), index_to_position(source, 10));
    }
}
