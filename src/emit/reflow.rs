use crate::error::{Error, Result};

pub const TAB_SIZE: usize = 4;
pub const MAX_COL: usize = 100;

/// Split `line`, to be indented `depth` levels, into pieces that fit within
/// [`MAX_COL`] once indented.
///
/// The first piece is indented by `depth * TAB_SIZE` only. Every following
/// piece starts at the column just past the first `{` of the first piece (plus
/// one space), or at the base indent when the first piece has no brace.
pub fn reflow(line: &str, depth: usize) -> Result<Vec<String>> {
    let mut size = MAX_COL.saturating_sub(depth * TAB_SIZE);
    if line.len() < size {
        return Ok(vec![line.to_owned()]);
    }

    let mut lines = Vec::new();
    let mut cur = line;
    let mut padding = 0;
    while cur.len() > size {
        let Some(i) = cur.as_bytes()[..size].iter().rposition(|&b| b == b' ') else {
            return Err(Error::Reflow {
                line: line.to_owned(),
            });
        };
        lines.push(format!("{:padding$}{}", "", &cur[..i]));
        if lines.len() == 1 {
            if let Some(j) = cur[..i].find('{') {
                let j = j + 2;
                size = size.saturating_sub(j);
                padding = j;
            }
        }
        cur = &cur[i + 1..];
    }
    lines.push(format!("{:padding$}{}", "", cur));

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fits(lines: &[String], depth: usize) -> bool {
        lines.iter().all(|l| depth * TAB_SIZE + l.len() <= MAX_COL)
    }

    #[test]
    fn short_lines_are_untouched() {
        assert_eq!(reflow("return true;", 2).unwrap(), ["return true;"]);
        assert_eq!(reflow("", 0).unwrap(), [""]);
    }

    #[test]
    fn splits_at_last_space_before_limit() {
        let words = vec!["word"; 30].join(" ");
        let lines = reflow(&words, 0).unwrap();
        assert!(fits(&lines, 0));
        assert_eq!(lines.join(" "), words);
        // twenty words end at column 99, the space after them is the break
        assert_eq!(lines[0].split(' ').count(), 20);
    }

    #[test]
    fn continuation_aligns_after_first_brace() {
        let line = format!(
            "public static final String[] names = new String[] {{ {} }};",
            vec!["\"Name\","; 20].join(" ")
        );
        let lines = reflow(&line, 1).unwrap();
        assert!(lines.len() > 1);
        assert!(fits(&lines, 1));
        let brace = lines[0].find('{').unwrap();
        for cont in &lines[1..] {
            assert_eq!(cont.len() - cont.trim_start().len(), brace + 2);
        }
    }

    #[test]
    fn continuation_uses_base_indent_without_brace() {
        let line = vec!["abcdefghij"; 12].join(" ");
        let lines = reflow(&line, 3).unwrap();
        assert!(lines.len() > 1);
        assert!(fits(&lines, 3));
        assert!(lines.iter().all(|l| !l.starts_with(' ')));
    }

    #[test]
    fn depth_shrinks_the_budget() {
        let line = "x ".repeat(45);
        let line = line.trim_end();
        assert_eq!(reflow(line, 0).unwrap().len(), 1);
        assert!(reflow(line, 4).unwrap().len() > 1);
    }

    #[test]
    fn unbreakable_line_is_fatal() {
        let line = "x".repeat(MAX_COL + 1);
        let err = reflow(&line, 0).unwrap_err();
        assert!(matches!(err, Error::Reflow { line: l } if l == line));
    }
}
