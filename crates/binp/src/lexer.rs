//! Normalises one physical source line into a whitespace-separated token list.
//!
//! Single-char operator atoms are surrounded by spaces so that later stages can
//! split on whitespace instead of hand-rolling a scanner; the two-char atoms
//! (`==`, `!=`, `<=`, `>=`, `&&`, `||`) are recognised first so their halves are
//! never re-split. A `'...'` run is emitted as a single atomic token, internal
//! whitespace and all, since the preformatter treats quoted content as opaque.

/// Multi-char atoms, checked before the single-char table so `=` inside `==`
/// or `=>` is never re-split into two tokens.
const MULTI_CHAR_ATOMS: [&str; 7] = ["==", "!=", "<=", ">=", "&&", "||", "=>"];

const SINGLE_CHAR_ATOMS: [char; 13] = ['(', ')', ',', '.', '$', '+', '-', '*', '/', '%', '<', '>', '='];

/// Returns the atom set tokens that render without surrounding whitespace,
/// used by output/string rendering to collapse the spacing this module adds.
pub(crate) fn is_tight_atom(token: &str) -> bool {
    MULTI_CHAR_ATOMS.contains(&token) || (token.chars().count() == 1 && SINGLE_CHAR_ATOMS.contains(&token.chars().next().unwrap()))
}

/// Preformats one physical line, returning its tokens.
pub fn preformat_line(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            flush(&mut tokens, &mut current);
            let mut quoted = String::from('\'');
            i += 1;
            while i < chars.len() {
                quoted.push(chars[i]);
                let closed = chars[i] == '\'';
                i += 1;
                if closed {
                    break;
                }
            }
            tokens.push(quoted);
            continue;
        }
        if c.is_whitespace() {
            flush(&mut tokens, &mut current);
            i += 1;
            continue;
        }
        if let Some(atom) = MULTI_CHAR_ATOMS.iter().find(|atom| matches_at(&chars, i, atom)) {
            flush(&mut tokens, &mut current);
            tokens.push((*atom).to_owned());
            i += atom.len();
            continue;
        }
        if SINGLE_CHAR_ATOMS.contains(&c) {
            flush(&mut tokens, &mut current);
            tokens.push(c.to_string());
            i += 1;
            continue;
        }
        current.push(c);
        i += 1;
    }
    flush(&mut tokens, &mut current);
    tokens
}

fn matches_at(chars: &[char], i: usize, atom: &str) -> bool {
    let atom_chars: Vec<char> = atom.chars().collect();
    chars.len() >= i + atom_chars.len() && chars[i..i + atom_chars.len()] == atom_chars[..]
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// Preformats an entire source file into its per-line token vectors.
///
/// Done once up front so hot paths (in particular `while` bodies, dispatched
/// repeatedly) never re-split a line.
pub fn preformat_source(source: &str) -> Vec<Vec<String>> {
    source.lines().map(preformat_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_single_char_operators() {
        assert_eq!(preformat_line("var int x=2+3*4"), vec!["var", "int", "x", "=", "2", "+", "3", "*", "4"]);
    }

    #[test]
    fn keeps_multi_char_operators_atomic() {
        assert_eq!(preformat_line("if(i<=3)=>"), vec!["if", "(", "i", "<=", "3", ")", "=>"]);
        assert_eq!(preformat_line("a==b"), vec!["a", "==", "b"]);
        assert_eq!(preformat_line("a!=b&&c||d"), vec!["a", "!=", "b", "&&", "c", "||", "d"]);
    }

    #[test]
    fn treats_quoted_runs_as_one_token_even_with_spaces() {
        assert_eq!(preformat_line("output 'hello world'"), vec!["output", "'hello world'"]);
    }

    #[test]
    fn collapses_existing_whitespace() {
        assert_eq!(preformat_line("  var   int   x   =   1  "), vec!["var", "int", "x", "=", "1"]);
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        assert!(preformat_line("   ").is_empty());
    }

    #[test]
    fn unterminated_quote_is_kept_as_a_single_trailing_token() {
        assert_eq!(preformat_line("output 'oops"), vec!["output", "'oops"]);
    }
}
