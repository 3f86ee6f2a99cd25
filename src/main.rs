use geostream::prelude::*;

#[tokio::main]
async fn main() {
    init_tracing();
    CliApp::new("geostream").run(run_collector).await
}

/// Load configuration from beside the executable and collect until stopped
async fn run_collector(
    writer: tokio::io::BufWriter<tokio::io::Stdout>,
) -> Result<(), AppError> {
    let home = install_dir()?;
    let params = Parameters::load(&home.join(PARAMETERS_FILE), &home).await?;
    let credentials = Credentials::load(&home.join(CREDENTIALS_FILE)).await?;

    tracing::info!(
        out_file = %params.out_file.display(),
        bbox = %params.bounding_box.to_locations_param(),
        timeout_s = params.timeout.as_secs_f64(),
        retry_delay_s = params.retry_delay.as_secs_f64(),
        "Configuration loaded"
    );

    let upstream = FilterStreamClient::new(OAuthSigner::new(credentials), params.timeout)?;
    // Created with its header on the first stored record
    let store = AppendStore::new(params.out_file.clone());
    let logger = EventLogger::new(home.join("log"));

    Supervisor::new(upstream, store, logger, SupervisorConfig::from_parameters(&params))
        .run(writer)
        .await;
    Ok(())
}
