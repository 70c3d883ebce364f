//! Local account stub commands.

use anyhow::Result;
use weaver_core::config::WeaverConfig;
use weaver_core::user::UserService;
use weaver_infrastructure::TomlUserStore;

pub async fn login(config: &WeaverConfig, email: &str) -> Result<()> {
    let store = TomlUserStore::new(&config.storage_dir)?;
    let user = store.sign_in(email).await?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub async fn logout(config: &WeaverConfig) -> Result<()> {
    let store = TomlUserStore::new(&config.storage_dir)?;
    store.sign_out().await?;
    println!("Signed out.");
    Ok(())
}

pub async fn whoami(config: &WeaverConfig) -> Result<()> {
    let store = TomlUserStore::new(&config.storage_dir)?;
    match store.current_user().await? {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not signed in."),
    }
    Ok(())
}
