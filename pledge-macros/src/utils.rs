use proc_macro::{TokenStream, TokenTree};

/// Splits a `TokenStream` into comma-separated arguments.
///
/// Each argument is returned as a `Vec<TokenTree>`. Only top-level commas
/// separate arguments; commas inside groups stay inside their argument.
pub(crate) fn split_args(input: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(current);
                    current = Vec::new();
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Converts a slice of tokens into a Rust source string.
///
/// Consecutive identifiers are separated by a space so that `mut handle`
/// does not become `muthandle`.
pub(crate) fn tokens_to_string(tokens: &[TokenTree]) -> String {
    let mut out = String::new();
    let mut prev_was_ident = false;

    for t in tokens {
        let is_ident = matches!(t, TokenTree::Ident(_));

        if prev_was_ident && is_ident {
            out.push(' ');
        }

        out.push_str(&t.to_string());
        prev_was_ident = is_ident;
    }

    out
}

/// Parses the attribute arguments of `#[pledge::test]`.
///
/// The only supported argument is `deadline_ms = <integer>`.
pub(crate) fn parse_deadline(attr: &str) -> Result<Option<u64>, String> {
    let mut deadline = None;

    for part in attr.split(',') {
        let part = part.trim();

        if part.is_empty() {
            continue;
        }

        let Some(value) = part.strip_prefix("deadline_ms") else {
            return Err(format!("unknown #[pledge::test] argument `{part}`"));
        };

        let value = value.trim_start().trim_start_matches('=').trim();

        match value.parse::<u64>() {
            Ok(0) => return Err("deadline_ms must be > 0".to_string()),
            Ok(ms) => deadline = Some(ms),
            Err(_) => return Err(format!("invalid deadline_ms `{value}`")),
        }
    }

    Ok(deadline)
}

/// Extracts the binding name of the optional `LoopHandle` parameter.
///
/// `()` yields `None`; `(handle: LoopHandle)` yields `Some("handle")`.
pub(crate) fn handle_binding(params: TokenStream) -> Result<Option<String>, String> {
    let args = split_args(params);

    match args.as_slice() {
        [] => Ok(None),
        [param] => {
            let Some(colon) = param
                .iter()
                .position(|t| matches!(t, TokenTree::Punct(p) if p.as_char() == ':'))
            else {
                return Err("expected `name: LoopHandle`".to_string());
            };

            if colon == 0 {
                return Err("expected `name: LoopHandle`".to_string());
            }

            Ok(Some(tokens_to_string(&param[..colon])))
        }
        _ => Err("#[pledge::test] accepts at most one `LoopHandle` parameter".to_string()),
    }
}

/// Expands to a `compile_error!` carrying `msg`.
pub(crate) fn compile_error(msg: &str) -> TokenStream {
    format!("::core::compile_error!({msg:?});").parse().unwrap()
}
