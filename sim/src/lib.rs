use log::info;
use rand::Rng;
use relief_structs::{config::ScenarioConfig, problem::Scenario, Point, RiskZone, Target};

/// Random disaster map: targets anywhere on the square map, storms kept away
/// from the edges, base at the origin.
///
/// Draw order: for each target x then y, then for each storm center x, center y
/// and radius. All draws are whole kilometres.
pub fn generate_scenario<R: Rng>(cfg: &ScenarioConfig, rng: &mut R) -> Scenario {
    let targets = (1..=cfg.num_targets)
        .map(|id| {
            let x = rng.gen_range(0..=cfg.map_size);
            let y = rng.gen_range(0..=cfg.map_size);
            Target {
                id,
                loc: Point::new(x as f32, y as f32),
            }
        })
        .collect::<Vec<_>>();

    let (c_lo, c_hi) = cfg.risk_center_range();
    let (r_lo, r_hi) = cfg.risk_radius_range;
    let risk_zones = (0..cfg.num_risk_zones)
        .map(|_| {
            let x = rng.gen_range(c_lo..=c_hi);
            let y = rng.gen_range(c_lo..=c_hi);
            let r = rng.gen_range(r_lo..=r_hi);
            RiskZone {
                center: Point::new(x as f32, y as f32),
                radius: r as f32,
            }
        })
        .collect::<Vec<_>>();

    info!(
        "map {0}x{0}: {1} targets, {2} storms",
        cfg.map_size,
        targets.len(),
        risk_zones.len()
    );

    Scenario {
        base: Point::ORIGIN,
        targets,
        risk_zones,
    }
}
