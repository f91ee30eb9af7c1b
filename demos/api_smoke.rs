//! Manual smoke test against a running studio server
//!
//! Fetches the voice catalog, synthesizes one line with the auto-selected
//! voice, and writes the result to smoke.mp3. Point TTSC_API_BASE at the
//! server first if it isn't on localhost:5000.
//!
//! Run with: cargo run --example api_smoke

use std::time::Duration;
use ttsc::api::types::SpeakRequest;
use ttsc::api::ApiClient;
use ttsc::catalog::{Selection, VoiceCatalog};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let base = std::env::var("TTSC_API_BASE").unwrap_or_else(|_| "http://localhost:5000".into());
    println!("Server: {}", base);

    let client = ApiClient::new(&base, Duration::from_secs(30))?;

    let catalog = VoiceCatalog::from_groups(client.voices()?);
    println!("Languages: {:?}", catalog.languages());

    let selection = Selection::auto_select(&catalog);
    let Some(voice) = selection.voice() else {
        anyhow::bail!("catalog has no voices");
    };
    println!("Voice: {}", voice);

    let request = SpeakRequest::new(
        "Hello from the console client.",
        voice,
        0.0,
        1.0,
        1.0,
        false,
    );
    let result = client.speak(&request)?;
    println!(
        "Got {} bytes (detected: {})",
        result.audio.len(),
        result.detected_lang.as_deref().unwrap_or("none")
    );

    std::fs::write("smoke.mp3", &result.audio)?;
    println!("Wrote smoke.mp3");
    Ok(())
}
