//! Login, logout, and signup handlers.

use mailroom_dashboard::core::forms::{LoginForm, SignupForm};
use mailroom_dashboard::core::session::LoginError;

use crate::cli::{AppContext, LoginArgs, SignupArgs};
use crate::client::{CliError, CliResult};
use crate::commands::prompt_line;

fn prompt_password(prompt: &str) -> CliResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|err| CliError::failure(anyhow::anyhow!("failed to read password: {err}")))
}

pub(crate) fn handle_login(ctx: &mut AppContext, args: LoginArgs) -> CliResult<()> {
    let email = match args.email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };
    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };
    let form = LoginForm { email, password };
    match ctx.dashboard.shell_mut().login(&form) {
        Ok(route) => {
            println!("Logged in; continue at {}", route.path());
            Ok(())
        }
        Err(LoginError::Invalid(errors)) => Err(CliError::validation(errors.to_string())),
        Err(LoginError::Storage(err)) => Err(CliError::failure(err)),
    }
}

pub(crate) fn handle_logout(ctx: &mut AppContext) -> CliResult<()> {
    let route = ctx
        .dashboard
        .shell_mut()
        .logout()
        .map_err(CliError::failure)?;
    println!("Logged out; continue at {}", route.path());
    Ok(())
}

pub(crate) fn handle_signup(ctx: &mut AppContext, args: SignupArgs) -> CliResult<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };
    let confirm_password = match args.confirm {
        Some(confirm) => confirm,
        None => prompt_password("Retype password: ")?,
    };
    let form = SignupForm {
        name: args.name,
        email: args.email,
        password,
        confirm_password,
    };
    let route = ctx
        .dashboard
        .shell_mut()
        .signup(&form)
        .map_err(|errors| CliError::validation(errors.to_string()))?;
    println!("Signup details accepted; continue at {}", route.path());
    Ok(())
}
