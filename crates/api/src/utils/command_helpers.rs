//! Command execution helpers
//!
//! Times a command, logs its outcome and hands the result back unchanged.

use std::future::Future;
use std::time::Instant;

use georemind_domain::Result as DomainResult;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a fallible command with timing and structured logging.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn my_command(ctx: &AppContext) -> Result<MyResponse> {
///     execute_command("my_module::my_command", || async {
///         ctx.some_service.do_something().await
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();
    let result = command_fn().await;
    let error_type = result.as_ref().err().map(error_label);

    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}

/// Execute an infallible command with timing and structured logging.
pub async fn execute_infallible<F, Fut, T>(command_name: &str, command_fn: F) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let start = Instant::now();
    let value = command_fn().await;
    log_command_execution(command_name, start.elapsed(), true, None);
    value
}
