use std::collections::BTreeSet;

use chills_core::{
    BlockReason, Discovery, Matcher, Normalizer, OverlapScope, Roster, SortOrder, SquadCourse,
    intersect,
};

const ROSTER: &str = r#"{
    "me": {
        "user_id": "me",
        "first_name": "Mia",
        "last_name": "Chen",
        "enrolments": [
            {"course": "COMP1511", "class": "tut", "section": "H11A",
             "start_time": "2024-03-04T11:00:00Z", "end_time": "2024-03-04T13:00:00Z"},
            {"course": "MATH1081", "class": "lec",
             "start_time": "2024-03-05T09:00:00Z", "end_time": "2024-03-05T11:00:00Z"}
        ]
    },
    "classmates": [
        {
            "user_id": "x",
            "first_name": "Xavier",
            "last_name": "Xu",
            "enrolments": [
                {"course": "COMP1511", "class": "tut", "section": "H11A",
                 "start_time": "2024-03-04T11:00:00Z", "end_time": "2024-03-04T13:00:00Z"},
                {"course": "PHYS1121", "class": "lec",
                 "start_time": "2024-03-05T09:00:00Z", "end_time": "2024-03-05T11:00:00Z"}
            ]
        },
        {
            "user_id": "y",
            "first_name": "Yara",
            "last_name": "Young",
            "enrolments": [
                {"course": "COMP1511", "class": "tut", "section": "T13B",
                 "start_time": "2024-03-05T15:00:00Z", "end_time": "2024-03-05T17:00:00Z"},
                {"course": "MATH1081", "class": "lec",
                 "start_time": "2024-03-05T10:00:00Z", "end_time": "2024-03-05T12:00:00Z"}
            ]
        },
        {
            "user_id": "z",
            "first_name": "Zoe",
            "last_name": "Zhang",
            "enrolments": [
                {"course": "ARTS1000", "class": "lec",
                 "start_time": "2024-03-08T09:00:00Z", "end_time": "2024-03-08T10:00:00Z"}
            ]
        }
    ]
}"#;

fn courses(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|c| c.to_string()).collect()
}

fn session() -> Discovery {
    let roster = Roster::from_json(ROSTER).unwrap();
    let (me, candidates) = roster.profiles(&Normalizer::default());
    let matches = Matcher::new(OverlapScope::SameCourse).match_all(&me, &candidates);
    Discovery::new(matches, SortOrder::CommonCourses)
}

#[test]
fn match_flags_from_roster() {
    let d = session();
    let by_id = |id: &str| d.matches().iter().find(|m| m.user_id() == id).unwrap();

    let x = by_id("x");
    assert_eq!(x.shared_courses, courses(&["COMP1511"]));
    assert!(x.same_tutorial);
    assert!(x.time_overlap);
    assert!(x.same_day);

    // MATH1081 lectures overlap 10:00-11:00 on Tuesday
    let y = by_id("y");
    assert_eq!(y.shared_courses, courses(&["COMP1511", "MATH1081"]));
    assert!(!y.same_tutorial);
    assert!(y.time_overlap);
    assert!(y.same_day);

    let z = by_id("z");
    assert!(z.shared_courses.is_empty());
    assert!(!z.time_overlap);
    assert!(!z.same_day);
}

#[test]
fn squad_course_follows_selection() {
    let mut d = session();
    assert_eq!(d.squad_course(), SquadCourse::NoSelection);

    d.toggle_user("x");
    d.toggle_user("y");
    assert_eq!(
        intersect(d.selected().map(|m| &m.shared_courses)),
        courses(&["COMP1511"])
    );
    assert_eq!(
        d.squad_course(),
        SquadCourse::Implied("COMP1511".to_string())
    );

    let draft = d.draft_squad("Tut crew", "weekly revision", "me", None).unwrap();
    assert_eq!(draft.course, "COMP1511");
    assert_eq!(draft.member_ids, vec!["x", "y"]);

    d.toggle_user("z");
    assert!(intersect(d.selected().map(|m| &m.shared_courses)).is_empty());
    assert_eq!(
        d.squad_course(),
        SquadCourse::Blocked(BlockReason::NoCommonCourse)
    );
    assert!(d.draft_squad("Tut crew", "", "me", None).is_err());
}

#[test]
fn ranking_is_stable_under_reordering() {
    let roster = Roster::from_json(ROSTER).unwrap();
    let (me, mut candidates) = roster.profiles(&Normalizer::default());
    let matcher = Matcher::default();

    let sort = SortOrder::CommonCourses;
    let forward = Discovery::new(matcher.match_all(&me, &candidates), sort);
    candidates.reverse();
    let backward = Discovery::new(matcher.match_all(&me, &candidates), sort);

    let ids = |d: &Discovery| {
        d.visible()
            .iter()
            .map(|m| m.user_id().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&forward), vec!["y", "x", "z"]);
    assert_eq!(ids(&forward), ids(&backward));
}
