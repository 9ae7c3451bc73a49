use serde_json::json;

use crate::auth::TokenService;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

/// Print a freshly signed token. The user is not looked up.
pub fn handle(config: &AppConfig, user_id: i64, email: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let tokens = TokenService::new(&config.security);
    let token = tokens.issue(user_id, email)?;

    match output_format {
        OutputFormat::Json => {
            let body = json!({
                "token": token,
                "user_id": user_id,
                "email": email,
                "expires_in": tokens.expires_in(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => println!("{}", token),
    }

    Ok(())
}
