mod message;

use proc_macro::TokenStream;

use message::Kind;

// ============================================================================
// #[derive(Command)]
// ============================================================================

/// Derive macro that marks a struct as a command.
///
/// # Usage
///
/// Without a result (fire-and-forget):
/// ```ignore
/// #[derive(Command)]
/// struct CreateUser {
///     name: String,
/// }
/// ```
///
/// With a result:
/// ```ignore
/// #[derive(Command)]
/// #[command(result = UserId)]
/// struct RegisterUser {
///     name: String,
/// }
/// ```
///
/// - `#[command(result = Type)]` implements `Command<Type>`. Repeat the
///   attribute to implement it for several result types.
/// - Without the attribute, implements `Command` (no result).
#[proc_macro_derive(Command, attributes(command))]
pub fn derive_command(input: TokenStream) -> TokenStream {
    message::derive_message(input, Kind::Command)
}

// ============================================================================
// #[derive(Query)]
// ============================================================================

/// Derive macro that marks a struct as a query.
///
/// # Usage
///
/// ```ignore
/// #[derive(Query)]
/// #[query(result = UserDto)]
/// struct GetUserById {
///     id: u64,
/// }
/// ```
///
/// `#[query(result = Type)]` is required: a query always produces a result.
#[proc_macro_derive(Query, attributes(query))]
pub fn derive_query(input: TokenStream) -> TokenStream {
    message::derive_message(input, Kind::Query)
}
