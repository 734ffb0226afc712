use sitrep::{discovery, Coord, IncidentStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <lat> <lng> [radius_km]", args[0]);
        return Ok(());
    }

    let lat: f64 = args[1].parse()?;
    let lng: f64 = args[2].parse()?;
    let radius: f64 = match args.get(3) {
        Some(raw) => raw.parse()?,
        None => discovery::DEFAULT_RADIUS_KM,
    };

    let center = Coord::new(lat, lng);
    let store = IncidentStore::demo();
    let results = sitrep::nearby(&store, center, radius);

    if results.is_empty {
        println!("No incidents within {radius} km of {lat}, {lng}");
        return Ok(());
    }

    println!(
        "{} of {} incidents within {radius} km of {lat}, {lng}",
        results.result_count,
        store.len()
    );

    for incident in &results.incidents {
        println!();
        println!("{}", incident.title);
        println!("  Type: {}", incident.kind);
        println!("  Severity: {}", incident.severity);
        println!(
            "  Distance: {:.1} km",
            center.distance_km(&incident.location.coord())
        );
        match &incident.location.address {
            Some(address) => println!(
                "  Location: {}, {} ({})",
                incident.location.lat, incident.location.lng, address
            ),
            None => println!(
                "  Location: {}, {}",
                incident.location.lat, incident.location.lng
            ),
        }
        println!(
            "  Reported: {} by {}",
            incident.timestamp.format("%Y-%m-%d %H:%M UTC"),
            incident.reported_by
        );
        println!("  Verified: {}", incident.verified);
    }

    Ok(())
}
