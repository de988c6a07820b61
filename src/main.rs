// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod app;
mod config;
mod map;
mod notice;
mod renderer;

use clap::Parser;
use disaster_client::DisasterApi;
use log::{info, warn};

use app::DisasterMapApp;
use config::AppConfig;

/// Satellite map with disaster-risk heat overlays
#[derive(Parser, Debug)]
#[command(name = "disaster-heatmap", version, about)]
struct Args {
    /// Disaster identifier to load on start-up (fire, flood, earthquake, storm, ...)
    #[arg(short, long)]
    disaster: Option<String>,

    /// Backend base URL, overrides DISASTER_API_URL and the config file
    #[arg(long)]
    api_url: Option<String>,

    /// Print the config file location and exit
    #[arg(long)]
    print_config_path: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.print_config_path {
        println!("{}", AppConfig::get_config_path()?.display());
        return Ok(());
    }

    info!("Starting Disaster Heatmap...");

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    let api_base_url = config.resolve_api_base_url(args.api_url.as_deref());
    info!("Using backend at {}", api_base_url);
    let api = DisasterApi::new(&api_base_url);
    if let Err(e) = &api {
        warn!("Backend unavailable, map will open without heat data: {}", e);
    }

    let initial_disaster = args
        .disaster
        .unwrap_or_else(|| config.default_disaster.clone());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("disaster-fetch")
        .build()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_title("Disaster Heatmap"),
        ..Default::default()
    };

    info!("Initializing window...");
    eframe::run_native(
        "Disaster Heatmap",
        options,
        Box::new(move |cc| {
            Ok(Box::new(DisasterMapApp::new(
                cc,
                config,
                api,
                &api_base_url,
                runtime,
                initial_disaster,
            )))
        }),
    )?;

    Ok(())
}
