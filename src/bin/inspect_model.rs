//! Utility to inspect a model artifact and optionally quote one applicant.
//!
//! Usage: `inspect_model [MODEL_PATH] [AGE GENDER HT WT]`

use bmi_quote_api::classifier::Classifier;
use bmi_quote_api::config::DEFAULT_MODEL_PATH;
use bmi_quote_api::gbdt::GradientBoostedModel;
use bmi_quote_api::model_artifact::ModelArtifact;
use bmi_quote_api::models::ApplicantRequest;
use bmi_quote_api::quote::resolve_quote;
use dotenvy::dotenv;
use std::env;

/// Main entry point for the model inspection utility.
///
/// Prints the artifact checksum and shape; with applicant arguments, also
/// prints the converted measurements and the resulting quote.
fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().skip(1).collect();

    let model_path = args
        .first()
        .cloned()
        .or_else(|| env::var("MODEL_PATH").ok())
        .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string());

    let artifact = ModelArtifact::read(&model_path)?;
    let model = GradientBoostedModel::from_slice(artifact.bytes())?;

    println!("Model: {}", model_path);
    println!("  sha256:   {}", artifact.checksum());
    println!("  size:     {} bytes", artifact.len());
    println!("  features: {}", model.n_features());
    println!("  classes:  {}", model.n_classes());
    println!("  stages:   {}", model.n_stages());

    let [age, gender, ht, wt] = match &args[1.min(args.len())..] {
        [] => return Ok(()),
        [age, gender, ht, wt] => [age, gender, ht, wt],
        _ => anyhow::bail!("expected AGE GENDER HT WT after the model path"),
    };

    let applicant = ApplicantRequest {
        app_id: 0,
        age: age.parse()?,
        gender: gender.clone(),
        ht: ht.clone(),
        wt: wt.clone(),
        issue_date: None,
    };
    let parsed = applicant.parse()?;
    let category = model.predict(&parsed.features())?;
    let quote = resolve_quote(category, parsed.gender.is_female())?;

    println!();
    println!("Applicant:");
    println!("  height:   {:.4} m", parsed.height_metric);
    println!("  weight:   {:.4} kg", parsed.weight_metric);
    println!("  bmi:      {:.2}", parsed.bmi);
    println!("  category: {}", category);
    println!("  quote:    {}", quote.amount);
    println!("  reason:   {}", quote.reason);

    Ok(())
}
