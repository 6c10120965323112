//! Extraction tests against saved copies of the dashboard page

use chrono::Datelike;
use dayzero::extract::{parse, Direction, Snapshot, Status, UNDER_REVIEW};

const DASHBOARD: &[u8] = include_bytes!("fixtures/dashboard.html");
const UNDER_REVIEW_PAGE: &[u8] = include_bytes!("fixtures/dashboard_under_review.html");

fn snapshot() -> Snapshot {
    parse(DASHBOARD).expect("fixture should parse")
}

#[test]
fn test_day_zero() {
    let d = snapshot();
    assert_eq!(d.day_zero.year(), 2018);
    assert_eq!(d.day_zero.month(), 4);
    assert_eq!(d.day_zero.day(), 12);
    assert_eq!(d.day_zero.to_rfc3339(), "2018-04-12T00:00:00+02:00");
}

#[test]
fn test_stats_as_at_week() {
    let stats = snapshot().stats_as_at_week.expect("banner present");
    assert_eq!(stats.to_rfc3339(), "2018-01-22T00:00:00+02:00");
}

#[test]
fn test_dams() {
    let d = snapshot();
    assert_eq!(d.dams.level, 27.2);
    assert_eq!(d.dams.trend.amount, 1.5);
    assert_eq!(d.dams.trend.direction, Direction::Down);
    assert_eq!(
        d.dams.description,
        "Combined level of dams supplying the city. For more info click here."
    );
    assert_eq!(
        d.dams.description_url.as_deref(),
        Some("http://www.capetown.gov.za/damlevels")
    );
}

#[test]
fn test_cape_tonians() {
    let d = snapshot();
    assert_eq!(d.cape_tonians.amount, 41.0);
    assert_eq!(d.cape_tonians.trend.amount, 2.0);
    assert_eq!(d.cape_tonians.trend.direction, Direction::Up);
    assert_eq!(
        d.cape_tonians.description,
        "Percentage of residents using 87 l or less per day."
    );
}

#[test]
fn test_cape_tonian_amount_under_review() {
    let d = parse(UNDER_REVIEW_PAGE).expect("blank amount is not an error");
    assert_eq!(d.cape_tonians.amount, UNDER_REVIEW);
    assert!(d.cape_tonians.is_under_review());
    assert_eq!(d.stats_as_at_week, None);
}

#[test]
fn test_city() {
    let d = snapshot();
    assert_eq!(d.city.progress, 57.0);
    assert_eq!(
        d.city.description,
        "The City's progress on securing alternative water sources."
    );
}

#[test]
fn test_city_projects() {
    let d = snapshot();
    assert_eq!(d.city.projects.len(), 7);

    let first = &d.city.projects[0];
    assert_eq!(first.area, "Cape Town Harbour");
    assert_eq!(first.kind, "Desalination");
    assert_eq!(first.percentage, 50.0);
    assert_eq!(first.status, Status::BehindSchedule);

    assert_eq!(d.city.projects[3].status, Status::OnSchedule);
    assert_eq!(d.city.projects[5].status, Status::Unknown);
    assert_eq!(d.city.projects[6].area, "V&A Waterfront");
}

#[test]
fn test_other_projects() {
    let d = snapshot();
    assert_eq!(
        d.other.description,
        "Additional projects in advanced stage of planning that are ready to proceed if required."
    );
    assert_eq!(d.other.projects.len(), 12);

    let first = &d.other.projects[0];
    assert_eq!(first.area, "Hout Bay");
    assert_eq!(first.kind, "Desalination");
    assert_eq!(first.percentage, 45.0);
    assert_eq!(first.status, Status::Unknown);

    assert_eq!(d.other.projects[1].area, "Red Hill / Dido Valley");
}

#[test]
fn test_percentages_in_range() {
    for page in [DASHBOARD, UNDER_REVIEW_PAGE] {
        let d = parse(page).unwrap();
        let in_range = |v: f64| (0.0..=100.0).contains(&v);

        assert!(in_range(d.city.progress));
        assert!(in_range(d.dams.level));
        assert!(in_range(d.cape_tonians.amount) || d.cape_tonians.amount == UNDER_REVIEW);
        assert!(d
            .city
            .projects
            .iter()
            .chain(d.other.projects.iter())
            .all(|p| in_range(p.percentage)));
    }
}

#[test]
fn test_json_shape() {
    let value = serde_json::to_value(snapshot()).unwrap();

    assert_eq!(value["dayzero"], "2018-04-12T00:00:00+02:00");
    assert_eq!(value["statsAsAtWeek"], "2018-01-22T00:00:00+02:00");
    assert_eq!(value["city"]["progress"], 57.0);
    assert_eq!(value["city"]["projects"][0]["type"], "Desalination");
    assert_eq!(value["city"]["projects"][0]["status"], -1);
    assert_eq!(value["dams"]["trend"]["direction"], -1);
    assert_eq!(
        value["dams"]["description_url"],
        "http://www.capetown.gov.za/damlevels"
    );
    assert_eq!(value["capetonians"]["amount"], 41.0);
    assert_eq!(value["capetonians"]["trend"]["direction"], 1);
    assert_eq!(value["other"]["projects"][0]["area"], "Hout Bay");
    assert_eq!(value["cached"], false);
    assert!(value["disclaimer"]
        .as_str()
        .unwrap()
        .starts_with("Data provided by the City of Cape Town"));
}

#[test]
fn test_json_omits_missing_stats_week() {
    let value = serde_json::to_value(parse(UNDER_REVIEW_PAGE).unwrap()).unwrap();
    assert!(value.get("statsAsAtWeek").is_none());
    assert_eq!(value["capetonians"]["amount"], -1.0);
}
