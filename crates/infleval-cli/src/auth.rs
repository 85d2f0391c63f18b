//! `infleval login`, `signup`, and `logout`.

use infleval_client::Credential;

use crate::{api_failure, App};

pub(crate) async fn run_login(app: &App, email: &str, password: &str) -> anyhow::Result<()> {
    let credential = app
        .client
        .login(email, password)
        .await
        .map_err(|e| api_failure(&e, "Login failed"))?;
    remember(app, &credential)?;
    println!("Logged in as {email}.");
    Ok(())
}

pub(crate) async fn run_signup(app: &App, email: &str, password: &str) -> anyhow::Result<()> {
    let credential = app
        .client
        .signup(email, password)
        .await
        .map_err(|e| api_failure(&e, "Signup failed"))?;
    remember(app, &credential)?;
    println!("Account created. Logged in as {email}.");
    Ok(())
}

pub(crate) fn run_logout(app: &App) -> anyhow::Result<()> {
    app.session().invalidate();
    let removed = app.store.clear().map_err(|e| {
        anyhow::anyhow!(
            "failed to remove credential at {}: {e}",
            app.store.path().display()
        )
    })?;
    if removed {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

fn remember(app: &App, credential: &Credential) -> anyhow::Result<()> {
    app.store.save(credential).map_err(|e| {
        anyhow::anyhow!(
            "logged in, but failed to store credential at {}: {e}",
            app.store.path().display()
        )
    })?;
    tracing::debug!(path = %app.store.path().display(), "credential stored");
    Ok(())
}
