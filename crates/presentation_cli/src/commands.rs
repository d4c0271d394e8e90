//! Subcommand implementations

use std::sync::Arc;

use anyhow::{Context, bail};
use application::{ProximityEvent, ProximityMonitor, WatchParameter};
use domain::{DomainError, GeoLocation, VehicleType};
use infrastructure::{AppConfig, LivePositionAdapter};
use integration_rtl::{HttpRtlClient, RtlClient};
use tracing::info;

/// Create a client and make sure it holds a valid token
async fn authenticated_client(config: &AppConfig) -> anyhow::Result<HttpRtlClient> {
    if !config.client.has_credentials() {
        bail!("no credentials configured: set RTL_EMAIL and RTL_PASSWORD or the [client] section");
    }

    let client = HttpRtlClient::new(&config.client).context("invalid client configuration")?;
    client.login_if_expired().await.context("login failed")?;
    Ok(client)
}

pub async fn routes(config: &AppConfig, vehicle_type: VehicleType) -> anyhow::Result<()> {
    let client = authenticated_client(config).await?;

    match vehicle_type {
        VehicleType::Bus => {
            let routes = client.bus_routes().await?;
            println!("🚌 {} bus routes:", routes.route_response.len());
            for route in &routes.route_response {
                println!("   {route} - {} stops", route.bus_route_stop_list.len());
            }
        },
        VehicleType::Vessel => {
            let routes = client.vessel_routes().await?;
            println!("⛴️  {} ferry routes:", routes.route_response.len());
            for route in &routes.route_response {
                println!("   {route}");
            }
        },
    }

    Ok(())
}

pub async fn products(
    config: &AppConfig,
    route: &str,
    vehicle_type: VehicleType,
) -> anyhow::Result<()> {
    let client = authenticated_client(config).await?;
    let details = client.product_details(route, vehicle_type).await?;

    println!("🎫 Products for [{}] {}:", details.route_number, details.name);
    for product in &details.products {
        println!("   {product}");
    }
    Ok(())
}

pub async fn live(config: &AppConfig, route: &str, vehicle_type: VehicleType) -> anyhow::Result<()> {
    let client = authenticated_client(config).await?;
    let vehicles = client
        .live_coordinates(route, vehicle_type)
        .await?
        .into_vehicles();

    if vehicles.is_empty() {
        println!("No {vehicle_type} currently reporting on route {route}");
        return Ok(());
    }

    println!("📍 {} vehicles on route {route}:", vehicles.len());
    for vehicle in &vehicles {
        println!(
            "   {:<10} {:<12} {}",
            vehicle.vehicle_id,
            vehicle.plate_number.as_deref().unwrap_or("-"),
            vehicle.location
        );
    }
    Ok(())
}

#[derive(Debug)]
pub struct BookRequest {
    pub route: String,
    pub product: String,
    pub count: u32,
    pub card_id: Option<i64>,
    pub vehicle_type: VehicleType,
}

pub async fn book(config: &AppConfig, request: &BookRequest) -> anyhow::Result<()> {
    if request.count == 0 {
        bail!("ticket count must be at least 1");
    }

    let client = authenticated_client(config).await?;
    let details = client
        .product_details(&request.route, request.vehicle_type)
        .await?;

    let Some(product) = details.find_product(&request.product) else {
        let available: Vec<_> = details.products.iter().map(|p| p.code.as_str()).collect();
        bail!(
            "product {} not sold on route {} (available: {})",
            request.product,
            request.route,
            available.join(", ")
        );
    };

    let (booking, payment) = if request.count == 1 {
        let outcome = client
            .purchase_ticket(&details, product, request.card_id)
            .await?;
        (outcome.booking, outcome.payment)
    } else {
        let booking = client
            .book_ticket(&details.code, &product.code, request.count)
            .await?;
        let payment = client.pay_booking(&booking, request.card_id).await?;
        (booking, payment)
    };

    println!("✅ {}", booking.message);
    println!("   Booking: {} ({})", booking.booking_id, booking.booking_date);
    println!("   Product: {product} x{}", request.count);
    println!("   Payment: {}", payment.url);
    Ok(())
}

#[derive(Debug)]
pub struct WatchRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub routes: Vec<String>,
    pub threshold_km: Option<f64>,
    pub vehicles: Vec<String>,
    pub vehicle_type: VehicleType,
}

/// Resolve the watch definition from the request
///
/// Without `--threshold-km` the monitor applies its configured default.
fn watch_parameter(request: WatchRequest) -> anyhow::Result<WatchParameter> {
    let anchor = GeoLocation::new(request.latitude, request.longitude)
        .map_err(|_| DomainError::invalid_coordinates(request.latitude, request.longitude))
        .context("invalid anchor")?;

    if let Some(route) = request.routes.iter().find(|r| r.trim().is_empty()) {
        return Err(DomainError::InvalidRouteCode(route.clone()).into());
    }

    let mut watch = WatchParameter::new(anchor, request.routes, request.vehicle_type, print_event);
    if let Some(threshold_km) = request.threshold_km {
        if !threshold_km.is_finite() || threshold_km <= 0.0 {
            return Err(DomainError::ValidationError(format!(
                "threshold must be a positive number of km, got {threshold_km}"
            ))
            .into());
        }
        watch = watch.with_threshold_km(threshold_km);
    }
    if !request.vehicles.is_empty() {
        watch = watch.with_vehicle_filter(request.vehicles);
    }
    Ok(watch)
}

#[allow(clippy::unnecessary_wraps)]
fn print_event(event: &ProximityEvent) -> Result<(), String> {
    println!(
        "🔔 {} {} on {} is {:.0} m away ({})",
        event.detected_at.format("%H:%M:%S"),
        event.vehicle_id,
        event.route_code,
        event.distance_km * 1000.0,
        event.plate_number.as_deref().unwrap_or("no plate"),
    );
    Ok(())
}

pub async fn watch(config: &AppConfig, request: WatchRequest) -> anyhow::Result<()> {
    let watch = watch_parameter(request)?;
    let client = authenticated_client(config).await?;

    let source = Arc::new(LivePositionAdapter::new(Arc::new(client)));
    let monitor = ProximityMonitor::new(source, &config.monitor);

    println!(
        "👀 Watching {} within {:.0} m of {} (every {}s, Ctrl-C to stop)",
        watch.routes.join(", "),
        watch
            .threshold_km
            .unwrap_or(config.monitor.default_threshold_km)
            * 1000.0,
        watch.anchor,
        config.monitor.poll_interval_secs
    );
    monitor.register(watch)?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    info!("Stopping monitor");
    monitor.shutdown().await;

    let stats = monitor.stats();
    println!(
        "Stopped after {} cycles: {} events, {} failed fetches",
        stats.cycles, stats.events, stats.fetch_failures
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> WatchRequest {
        WatchRequest {
            latitude: 4.1755,
            longitude: 73.5093,
            routes: vec!["M1".to_string()],
            threshold_km: None,
            vehicles: Vec::new(),
            vehicle_type: VehicleType::Bus,
        }
    }

    #[test]
    fn watch_without_threshold_defers_to_monitor() {
        let watch = watch_parameter(request()).unwrap();
        assert!(watch.threshold_km.is_none());
        assert!(watch.vehicle_filter.is_none());
        assert_eq!(watch.routes, vec!["M1".to_string()]);
    }

    #[test]
    fn explicit_threshold_and_vehicle_filter() {
        let watch = watch_parameter(WatchRequest {
            threshold_km: Some(1.5),
            vehicles: vec!["BUS7".to_string()],
            ..request()
        })
        .unwrap();
        assert!(watch.threshold_km.is_some_and(|t| (t - 1.5).abs() < f64::EPSILON));
        assert!(watch.accepts_vehicle("BUS7"));
        assert!(!watch.accepts_vehicle("BUS1"));
    }

    #[test]
    fn rejects_out_of_range_anchor() {
        let err = watch_parameter(WatchRequest {
            latitude: 95.0,
            ..request()
        })
        .unwrap_err();
        assert!(err.to_string().contains("invalid anchor"));
    }

    #[test]
    fn rejects_non_positive_threshold() {
        assert!(
            watch_parameter(WatchRequest {
                threshold_km: Some(0.0),
                ..request()
            })
            .is_err()
        );
    }

    #[test]
    fn rejects_blank_route_code() {
        let err = watch_parameter(WatchRequest {
            routes: vec!["R1".to_string(), "  ".to_string()],
            ..request()
        })
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::InvalidRouteCode(_))
        ));
    }

    #[tokio::test]
    async fn missing_credentials_fail_fast() {
        let config = AppConfig::default();
        let err = authenticated_client(&config).await.unwrap_err();
        assert!(err.to_string().contains("no credentials"));
    }
}
