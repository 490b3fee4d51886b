//! Seeded synthetic catalogs.

use rand::Rng;

use super::types::{Site, SiteCatalog};

/// `[min_lng, min_lat, max_lng, max_lat]` of Ethiopia, the region the
/// synthetic microgrid catalogs are drawn from.
pub const ETHIOPIA_BBOX: [f64; 4] = [32.997583, 3.397448, 47.982379, 14.894053];

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Generates a synthetic microgrid catalog of `num_sites` sites.
///
/// Costs are integers in `[15000, 50000)`, populations integers in
/// `[100, 1500)`, solar potential in `[3.5, 6.5)` and energy capacity
/// `solar * population * 0.3`, both rounded to two decimals. Identical RNG
/// state yields an identical catalog.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_siting::catalog::generate;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let catalog = generate(50, &mut rng);
/// assert_eq!(catalog.len(), 50);
/// ```
pub fn generate<R: Rng + ?Sized>(num_sites: usize, rng: &mut R) -> SiteCatalog {
    let [min_lng, min_lat, max_lng, max_lat] = ETHIOPIA_BBOX;

    let sites = (0..num_sites)
        .map(|i| {
            let installation_cost = f64::from(rng.random_range(15_000u32..50_000));
            let population_coverage = f64::from(rng.random_range(100u32..1_500));
            let solar_potential = round2(rng.random_range(3.5..6.5));
            let energy_capacity = round2(solar_potential * population_coverage * 0.3);
            let lng = rng.random_range(min_lng..max_lng);
            let lat = rng.random_range(min_lat..max_lat);
            Site {
                id: format!("Site_{}", i + 1),
                installation_cost,
                population_coverage,
                solar_potential,
                energy_capacity,
                coordinates: (lng, lat),
            }
        })
        .collect();

    SiteCatalog::new(sites)
}
