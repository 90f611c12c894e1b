use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, parse_macro_input, spanned::Spanned};

/// Marks a test that runs natively under `#[test]` and under
/// `wasm_bindgen_test` when compiled for `wasm32`.
///
/// Notification dispatch is fully synchronous, so only plain `fn` tests are
/// accepted.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);

  let raw_args = proc_macro2::TokenStream::from(attr);
  if !raw_args.is_empty() {
    return TokenStream::from(
      syn::Error::new(raw_args.span(), "rxobserver_macro::test does not take arguments")
        .to_compile_error(),
    );
  }

  if let Some(asyncness) = input.sig.asyncness {
    return TokenStream::from(
      syn::Error::new(
        asyncness.span(),
        "rxobserver_macro::test only supports synchronous tests; notify never suspends",
      )
      .to_compile_error(),
    );
  }

  let expanded = quote! {
      #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
      #[cfg_attr(not(target_arch = "wasm32"), test)]
      #input
  };

  TokenStream::from(expanded)
}
