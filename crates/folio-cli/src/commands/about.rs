//! About command implementation

use crate::cli::AboutArgs;
use crate::fields;
use crate::output::OutputWriter;
use crate::storage::Session;
use anyhow::{Context, Result};
use folio_core::models::About;

pub async fn execute(args: AboutArgs, session: &mut Session, output: &OutputWriter) -> Result<()> {
    let patch = fields::collect(&args.fields)?;

    let about = if patch.is_empty() {
        session.load().await?;
        session
            .client
            .data()
            .map(|data| data.about.clone())
            .context("Portal data is not loaded")?
    } else {
        let result = session.client.update_about(patch).await;
        let about = result.map_err(|e| session.fail(e))?;
        if !output.is_json() {
            output.success("Updated about");
        }
        about
    };

    if output.is_json() {
        output.result(&about)?;
    } else {
        print_about(&about, output);
    }
    Ok(())
}

fn print_about(about: &About, output: &OutputWriter) {
    output.section(&about.name);
    output.kv("Title", &about.title);
    output.kv("Email", &about.email);
    if let Some(phone) = &about.phone {
        output.kv("Phone", phone);
    }
    output.kv("Location", &about.location);
    if !about.interests.is_empty() {
        output.kv("Interests", about.interests.join(", "));
    }
    for (network, url) in &about.social {
        output.kv(network, url);
    }
    if !about.bio.is_empty() {
        println!("\n{}", about.bio);
    }
}
