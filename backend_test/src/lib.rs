use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type,
};

/// Transform an asynchronous test into a synchronous one, inject dependencies,
/// and ensure that the test's data file is removed regardless of how the test
/// terminates.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`], the
/// `DataFile` backing that client's registry, and, with
/// `#[backend_test(admin)]`, the `SessionToken` of a logged-in admin.
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);
    let login = parse_macro_input!(args as Option<Ident>);

    let as_admin = match login {
        None => false,
        Some(arg) if arg == "admin" => true,
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected `admin` or no argument")
                .into_compile_error()
                .into();
        }
    };

    // Extract the injected arguments and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone(), as_admin) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Log in as the default admin if needed.
    let maybe_login = if as_admin {
        quote! {
            let response = rocket_client
                .post("/api/admin/login")
                .header(rocket::http::ContentType::JSON)
                .body(rocket::serde::json::serde_json::json!({ "username": "admin", "password": "admin123" }).to_string())
                .dispatch()
                .await;
            assert_eq!(rocket::http::Status::Ok, response.status(), "admin login failed");
            let body: rocket::serde::json::serde_json::Value = response.into_json().await.unwrap();
            let admin_token = crate::model::session::SessionToken::from(
                body["data"]["token"].as_str().unwrap().to_string(),
            );
        }
    } else {
        quote! {
            let admin_token = ();
        }
    };

    // Rewrite the test function.
    quote! {
        #[test]
        #[allow(unused_variables)]
        fn #name() {
            /// The test itself.
            #item_fn

            /// Test cleanup.
            fn cleanup(data_file: &crate::model::persistence::DataFile) {
                let _ = std::fs::remove_file(data_file.path());
            }

            // Use a random file name to avoid collisions between tests.
            let random: u32 = rand::random();
            let data_file = crate::model::persistence::DataFile::new(
                std::env::temp_dir().join(format!("ourvoice-test{random}.json")),
            );

            let runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            // Run the setup and the test, catching any panics.
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                runtime.block_on(async {
                    let rocket_client = rocket::local::asynchronous::Client::tracked(
                        crate::rocket_for_data_file(data_file.path()),
                    )
                    .await
                    .unwrap();

                    #maybe_login

                    #new_name(#(#test_args),*).await;
                })
            }));

            // Run the cleanup.
            cleanup(&data_file);

            // If the test panicked, re-raise the panic.
            if let Err(cause) = result {
                std::panic::resume_unwind(cause);
            }
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature, as_admin: bool) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let (Pat::Ident(_), Type::Path(type_path)) = (&*pat_type.pat, &*pat_type.ty) {
                // Valid as the last path segment for any type is itself.
                let type_ident = &type_path.path.segments.last().unwrap().ident;
                if type_ident == "Client" {
                    if has_client {
                        return Err(syn::Error::new(
                            input.span(),
                            "Test cannot accept more than one `rocket::local::asynchronous::Client`",
                        ));
                    }
                    has_client = true;
                    args.push(quote! { rocket_client });
                    continue;
                } else if type_ident == "DataFile" {
                    args.push(quote! { data_file.clone() });
                    continue;
                } else if type_ident == "SessionToken" {
                    if !as_admin {
                        return Err(syn::Error::new(
                            input.span(),
                            "Injecting a `SessionToken` requires `#[backend_test(admin)]`",
                        ));
                    }
                    args.push(quote! { admin_token.clone() });
                    continue;
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client`, `file_ident: DataFile` or `token_ident: SessionToken`",
        ));
    }

    Ok(args)
}
