use std::path::PathBuf;
use std::str::FromStr;

use clap::{
    Args,
    Parser,
    Subcommand,
};
use eeprom_emu_tool::{
    region_statistics,
    EepromImage,
    Layout,
    Mcu,
};

#[derive(Parser)]
#[command(name = "eeprom-emu-tool")]
#[command(about = "eeprom-emu region image generator and parser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a region image from a CSV file
    Generate {
        /// Input CSV file path
        input: PathBuf,

        /// Output binary file path
        output: PathBuf,

        #[command(flatten)]
        region: RegionArgs,
    },
    /// Parse a region image to a CSV file
    Parse {
        /// Input binary file path
        input: PathBuf,

        /// Output CSV file path
        output: PathBuf,

        #[command(flatten)]
        region: RegionArgs,
    },
    /// Print slot usage of a region image
    Stats {
        /// Input binary file path
        input: PathBuf,

        #[command(flatten)]
        region: RegionArgs,
    },
}

#[derive(Args)]
struct RegionArgs {
    /// Use the region placement of a known microcontroller
    #[arg(long, value_parser = parse_mcu, conflicts_with_all = ["page_size", "pages"])]
    mcu: Option<Mcu>,

    /// Erase page size in bytes
    #[arg(long, value_parser = parse_size, requires = "pages")]
    page_size: Option<u32>,

    /// Number of erase pages in the region
    #[arg(long, requires = "page_size")]
    pages: Option<u32>,
}

impl RegionArgs {
    fn layout(&self) -> Result<Layout, String> {
        match (self.mcu, self.page_size, self.pages) {
            (Some(mcu), _, _) => Ok(mcu.layout()),
            (None, Some(page_size), Some(pages)) => Ok(Layout::new(0, page_size, pages)),
            _ => Err("either --mcu or --page-size and --pages are required".to_string()),
        }
    }
}

fn parse_mcu(s: &str) -> Result<Mcu, String> {
    Mcu::from_str(&s.to_lowercase()).map_err(|_| format!("unknown mcu: {s}"))
}

fn parse_size(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| e.to_string())
    } else {
        s.parse::<u32>().map_err(|e| e.to_string())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            region,
        } => {
            let layout = region.layout()?;

            println!("Parsing CSV file: {}", input.display());
            let image = EepromImage::from_csv_file(&input)?;
            println!("Found {} entries", image.entries.len());

            println!("Generating region image...");
            image.generate_region_file(&output, &layout)?;

            println!("Successfully generated region image: {}", output.display());
            println!(
                "Size: {} bytes ({} pages), capacity: {} bytes",
                layout.region_bytes(),
                layout.page_count,
                layout.capacity()
            );

            Ok(())
        }
        Commands::Parse {
            input,
            output,
            region,
        } => {
            let layout = region.layout()?;

            println!("Parsing region image: {}", input.display());
            let image = EepromImage::parse_region_file(&input, &layout)?;
            println!("Found {} live bytes", image.entries.len());

            println!("Writing CSV file...");
            image.to_csv_file(&output)?;

            println!("Successfully parsed region image to: {}", output.display());

            Ok(())
        }
        Commands::Stats { input, region } => {
            let layout = region.layout()?;

            let data = std::fs::read(&input)?;
            let statistics = region_statistics(&data, &layout)?;

            println!("Capacity:      {} bytes", statistics.capacity);
            println!("Live bytes:    {}", statistics.live_bytes);
            println!("Entry slots:   {}", statistics.entry_slots);
            println!("  used:        {}", statistics.used_slots);
            println!("  free:        {}", statistics.free_slots);
            println!("  torn:        {}", statistics.torn_slots);
            println!("  corrupt:     {}", statistics.corrupt_slots);

            Ok(())
        }
    }
}
