//! Map inspection commands.

use warehouse::Warehouse;

use crate::backend::create_backend;
use crate::cli::{MapsListArgs, MapsShowArgs};
use crate::output::{OutputFormat, print_json, print_table};

/// Run the `maps list` command
pub async fn list(args: &MapsListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let warehouse = Warehouse::new(create_backend(&args.backend_config).await?);
    let maps = warehouse.list_maps().await?;

    match OutputFormat::from_json_flag(args.json) {
        OutputFormat::Human => {
            if maps.is_empty() {
                println!("No maps found.");
            } else {
                let rows: Vec<Vec<String>> = maps
                    .iter()
                    .map(|m| {
                        vec![
                            m.map_id.to_string(),
                            m.map_name.clone(),
                            m.total_occupied_shelves.to_string(),
                        ]
                    })
                    .collect();
                print_table(&["ID", "NAME", "SHELVES"], &rows);
            }
        }
        OutputFormat::Json => print_json(&maps)?,
    }

    warehouse.close().await;
    Ok(())
}

/// Run the `maps show` command
pub async fn show(args: &MapsShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let warehouse = Warehouse::new(create_backend(&args.backend_config).await?);
    let map = warehouse.get_map(args.map_id).await?;

    match OutputFormat::from_json_flag(args.json) {
        OutputFormat::Human => {
            println!("Map:      {} ({})", map.map_name, map.map_id);
            println!("Aisles:   {}", map.total_runners);
            println!("Shelves:  {}", map.total_occupied_shelves);
            if !map.runners.is_empty() {
                println!();
                let rows: Vec<Vec<String>> = map
                    .runners
                    .iter()
                    .map(|r| vec![r.runner_id.to_string(), r.name.clone()])
                    .collect();
                print_table(&["AISLE ID", "NAME"], &rows);
            }
        }
        OutputFormat::Json => print_json(&map)?,
    }

    warehouse.close().await;
    Ok(())
}
