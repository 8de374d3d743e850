mod utils;

use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Runs an `async` test body to completion on a fresh `pledge::EventLoop`.
///
/// The body may take a single `pledge::LoopHandle` parameter, which is bound
/// to a handle of the loop running it:
///
/// ```rust,ignore
/// #[pledge::test]
/// async fn smoke(handle: pledge::LoopHandle) {
///     let deferred = handle.deferred::<u8>();
///     deferred.resolve(7);
///     assert_eq!(deferred.promise().wait().await.unwrap(), 7);
/// }
/// ```
///
/// `#[pledge::test(deadline_ms = 500)]` bounds how long the loop waits for
/// the body; the test panics when the deadline elapses.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let deadline_ms = match utils::parse_deadline(&attr.to_string()) {
        Ok(deadline) => deadline,
        Err(msg) => return utils::compile_error(&msg),
    };

    let mut tokens = item.into_iter().collect::<Vec<_>>();

    let Some(async_pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    else {
        return utils::compile_error("#[pledge::test] expects an `async fn`");
    };

    tokens.remove(async_pos);

    let Some(fn_pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "fn"))
    else {
        return utils::compile_error("#[pledge::test] expects an `async fn`");
    };

    // `fn <name> (<params>)`
    let params_pos = fn_pos + 2;

    let binding = match tokens.get(params_pos) {
        Some(TokenTree::Group(g)) if g.delimiter() == Delimiter::Parenthesis => {
            match utils::handle_binding(g.stream()) {
                Ok(binding) => binding,
                Err(msg) => return utils::compile_error(&msg),
            }
        }
        _ => return utils::compile_error("#[pledge::test] does not support generic test functions"),
    };

    tokens[params_pos] = TokenTree::Group(Group::new(Delimiter::Parenthesis, TokenStream::new()));

    let Some(block_pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return utils::compile_error("#[pledge::test] expects a function body");
    };

    let block = match &tokens[block_pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    let mut builder = String::from("::pledge::EventLoopBuilder::new()");

    if let Some(ms) = deadline_ms {
        builder.push_str(&format!(
            ".deadline(::std::time::Duration::from_millis({ms}))"
        ));
    }

    let bind = binding
        .map(|name| format!("let {name} = event_loop.handle();"))
        .unwrap_or_default();

    let new_block = format!(
        "{{
        let event_loop = {builder}.build();
        {bind}
        let outcome = event_loop.run(async move {{
            {{ {block} }};
            ::core::result::Result::Ok::<(), ::pledge::PromiseError>(())
        }});
        if let ::core::result::Result::Err(error) = outcome {{
            ::core::panic!(\"test body did not complete: {{}}\", error);
        }}
    }}"
    );

    tokens[block_pos] = TokenTree::Group(Group::new(Delimiter::Brace, new_block.parse().unwrap()));

    let test_attr: TokenStream = "#[::core::prelude::v1::test]".parse().unwrap();
    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(tokens);

    result.into_iter().collect()
}
