use std::{fs::File, io::BufWriter, path::PathBuf, time::Duration};

use clap::Parser;
use etherparse::PacketBuilder;
use pcap_analyzer::{
    link_type::LinkType,
    pcap::{PcapWriter, file_header::PcapFileHeader},
};

const CLIENT: [u8; 4] = [192, 168, 1, 1];
const SERVER: [u8; 4] = [192, 168, 1, 5];

#[derive(Parser, Debug)]
#[clap(name = "generate-capture")]
struct GenerateCapture {
    /// Where the pcap file is written
    #[clap(short, long, default_value = "test.pcap")]
    output: PathBuf,
}

fn tcp_frame(
    source: [u8; 4],
    destination: [u8; 4],
    source_port: u16,
    destination_port: u16,
    payload: &[u8],
) -> anyhow::Result<Vec<u8>> {
    let source_mac = [0x02, 0, 0, 0, 0, source[3]];
    let destination_mac = [0x02, 0, 0, 0, 0, destination[3]];
    let builder = PacketBuilder::ethernet2(source_mac, destination_mac)
        .ipv4(source, destination, 64)
        .tcp(source_port, destination_port, 1, 65535);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload)?;
    Ok(frame)
}

fn main() -> anyhow::Result<()> {
    let cli = GenerateCapture::parse();
    let file = BufWriter::new(File::create(&cli.output)?);
    let mut writer = PcapWriter::new(file, PcapFileHeader::new(LinkType::Ethernet, 65535))?;

    let start = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)?;
    let request = tcp_frame(CLIENT, SERVER, 1234, 80, b"GET / HTTP/1.1\r\n\r\n")?;
    let response = tcp_frame(SERVER, CLIENT, 80, 1234, b"HTTP/1.1 200 OK\r\n\r\n")?;
    writer.write_packet(start, &request)?;
    writer.write_packet(start + Duration::from_secs(1), &response)?;

    let mut file = writer.into_inner();
    std::io::Write::flush(&mut file)?;
    println!("Wrote 2 packets to {}", cli.output.display());
    Ok(())
}
