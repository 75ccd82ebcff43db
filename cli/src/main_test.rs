use super::*;
use urbancivic::MemoryStore;
use urbancivic::issue::seed_issues;

#[test]
fn parses_report_with_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "urbancivic",
        "report",
        "--title",
        "Blocked drain",
        "--category",
        "Waterlogging",
        "--lat",
        "-33.8688",
        "--lon",
        "151.2093",
    ])
    .unwrap();
    match cli.command {
        Command::Report { title, category, lat, location, .. } => {
            assert_eq!(title, "Blocked drain");
            assert_eq!(category, "Waterlogging");
            assert!((lat + 33.8688).abs() < f64::EPSILON);
            assert!(location.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_status_and_role_values() {
    let cli = Cli::try_parse_from(["urbancivic", "status", "3", "inprogress"]).unwrap();
    assert!(matches!(cli.command, Command::Status { id: 3, status: Status::InProgress }));

    let cli = Cli::try_parse_from(["urbancivic", "login", "--user", "meera", "--role", "admin"]).unwrap();
    assert!(matches!(cli.command, Command::Login { role: Role::Admin, .. }));

    assert!(Cli::try_parse_from(["urbancivic", "status", "3", "done"]).is_err());
    assert!(Cli::try_parse_from(["urbancivic", "login", "--user", "x", "--role", "root"]).is_err());
}

#[test]
fn summary_line_includes_icon_status_and_counts() {
    let issue = &seed_issues()[1];
    assert_eq!(
        summary_line(issue),
        "#2    🗑️ [inprogress] Overflowing trash bin - Park Avenue, Delhi (8 votes, 1 comments)"
    );
}

#[test]
fn stats_render_as_json() {
    let session = Session::open(MemoryStore::new(), Arc::new(NominatimClient::new(&Default::default()).unwrap()));
    let value = serde_json::to_value(session.stats()).unwrap();
    assert_eq!(value["total"], 5);
    assert_eq!(value["in_progress"], 2);
}
