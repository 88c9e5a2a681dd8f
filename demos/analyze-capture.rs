use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pcap_analyzer::{Analyzer, AnalyzerOptions, PcapNgLinkType};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LinkTypeArg {
    /// Decode every pcapng frame as Ethernet
    Ethernet,
    /// Use the link type of the interface description
    Interface,
}
impl From<LinkTypeArg> for PcapNgLinkType {
    fn from(value: LinkTypeArg) -> Self {
        match value {
            LinkTypeArg::Ethernet => PcapNgLinkType::AssumeEthernet,
            LinkTypeArg::Interface => PcapNgLinkType::FromInterface,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(name = "analyze-capture")]
struct AnalyzeCapture {
    // Path to the pcap or pcapng file to read
    file: PathBuf,
    /// Address whose traffic is counted
    target: String,
    /// Number of destinations listed in `topSentPeers`
    #[clap(long, default_value_t = 20)]
    top: usize,
    #[clap(long, value_enum, default_value_t = LinkTypeArg::Ethernet)]
    pcapng_link_type: LinkTypeArg,
    /// Log reader and worker progress to stderr
    #[clap(short, long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}
fn main() -> anyhow::Result<()> {
    let cli = AnalyzeCapture::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let capture = std::fs::read(&cli.file)?;
    let analyzer = Analyzer::new(AnalyzerOptions {
        pcapng_link_type: cli.pcapng_link_type.into(),
    });
    info!(file = ?cli.file, bytes = capture.len(), workers = analyzer.workers().get(), "Read capture");
    let stats = analyzer.analyze(&capture, &cli.target)?;

    let top: Vec<_> = stats
        .top_sent_peers(cli.top)
        .into_iter()
        .map(|(address, count)| serde_json::json!({ "address": address, "count": count }))
        .collect();
    let mut output = serde_json::to_value(&stats)?;
    if let Some(object) = output.as_object_mut() {
        object.insert("topSentPeers".to_owned(), serde_json::Value::Array(top));
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
