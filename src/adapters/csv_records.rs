//! Roster parsing from comma separated files with a header row.
//!
//! Column layout:
//! - clients: `id, country, city, segment`
//! - managers: `id, office, client_count, status`
//! - offices: `id, latitude, longitude`

use crate::domain::model::{Client, Coordinate, Manager, Office};
use crate::utils::error::Result;
use csv::{ReaderBuilder, StringRecord};

fn read_rows(data: &[u8]) -> Result<Vec<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(record);
    }
    Ok(rows)
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

fn is_vip(value: &str) -> bool {
    value.to_lowercase().contains("vip")
}

pub fn parse_clients(data: &[u8]) -> Result<Vec<Client>> {
    let clients: Vec<Client> = read_rows(data)?
        .iter()
        .map(|row| {
            Client::new(
                field(row, 0),
                field(row, 1),
                field(row, 2),
                is_vip(field(row, 3)),
            )
        })
        .collect();

    tracing::debug!("Parsed {} clients", clients.len());
    Ok(clients)
}

pub fn parse_managers(data: &[u8]) -> Result<Vec<Manager>> {
    let managers: Vec<Manager> = read_rows(data)?
        .iter()
        .map(|row| {
            let id = field(row, 0);
            let initial_client_count = field(row, 2).trim().parse().unwrap_or_else(|_| {
                tracing::debug!("Manager '{}' has no usable client count, using 0", id);
                0
            });
            Manager::new(
                id,
                field(row, 1).trim(),
                initial_client_count,
                is_vip(field(row, 3)),
            )
        })
        .collect();

    tracing::debug!("Parsed {} managers", managers.len());
    Ok(managers)
}

pub fn parse_offices(data: &[u8]) -> Result<Vec<Office>> {
    let offices: Vec<Office> = read_rows(data)?
        .iter()
        .map(|row| {
            let id = field(row, 0);
            let latitude = field(row, 1).trim().parse::<f64>();
            let longitude = field(row, 2).trim().parse::<f64>();
            let location = match (latitude, longitude) {
                (Ok(latitude), Ok(longitude)) => Some(Coordinate::new(latitude, longitude)),
                _ => {
                    tracing::warn!(
                        "Office '{}' has an unreadable location and will not be used for proximity",
                        id
                    );
                    None
                }
            };
            Office::new(id, location)
        })
        .collect();

    tracing::debug!("Parsed {} offices", offices.len());
    Ok(offices)
}
