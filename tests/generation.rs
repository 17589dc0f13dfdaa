//! End-to-end generation scenarios against the real HiGHS backend.

use chrono::NaiveTime;
use uni_timetabler::catalogue::{CatalogueData, CatalogueSnapshot};
use uni_timetabler::error::GeneratorError;
use uni_timetabler::progress::{ProgressStatus, RecordingSink};
use uni_timetabler::scheduler::{CancelToken, GeneratorConfig, Orchestrator, RunRegistry};
use uni_timetabler::store::{MemoryStore, PersistenceSink};
use uni_timetabler::types::{
    reassemble_blocks, Course, CourseId, DepartmentId, GroupAssignment, GroupId, Lecturer,
    LecturerAssignment, LecturerId, PlacedSlot, Room, RoomId, RoomKind, SessionConfig,
    SessionType, StudentGroup, TeachingPreferences, Timetable, TimetableId,
    UnavailabilityWindow,
};
use uni_timetabler::validator::validate_slots;

fn course(id: u32, code: &str, level: u8, lec: u8, tut: u8, prac: u8, kind: RoomKind) -> Course {
    Course {
        id: CourseId(id),
        code: code.into(),
        name: format!("Course {code}"),
        department_id: DepartmentId(1),
        level,
        credits: lec + tut + prac,
        lecture_hours: lec,
        tutorial_hours: tut,
        practical_hours: prac,
        preferred_room_type: kind,
        course_type: Default::default(),
        session_config: SessionConfig::default(),
        group_division_type: Default::default(),
    }
}

fn lecturer(id: u32) -> Lecturer {
    Lecturer {
        id: LecturerId(id),
        staff_number: format!("ST-{id:03}"),
        name: format!("Lecturer {id}"),
        email: String::new(),
        department_id: DepartmentId(1),
        max_hours_per_week: 20,
        preferences: TeachingPreferences::default(),
    }
}

fn room(id: u32, name: &str, room_type: &str) -> Room {
    Room {
        id: RoomId(id),
        name: name.into(),
        building: "Main".into(),
        capacity: 60,
        room_type: room_type.into(),
        room_category: None,
        department_affinity: None,
        equipment: vec![],
        availability: None,
        priority: Default::default(),
    }
}

fn group(id: u32, level: u8) -> StudentGroup {
    StudentGroup {
        id: GroupId(id),
        name: format!("G{id}"),
        level,
        department_id: DepartmentId(1),
        size: 40,
        group_type: Default::default(),
        parent_group: None,
        display_code: None,
    }
}

fn teaches(lecturer: u32, course: u32) -> LecturerAssignment {
    LecturerAssignment {
        lecturer_id: LecturerId(lecturer),
        course_id: CourseId(course),
        session_type: None,
        room_preference: None,
        group_division_required: false,
        expertise_level: "primary".into(),
    }
}

fn attends(group: u32, course: u32) -> GroupAssignment {
    GroupAssignment {
        group_id: GroupId(group),
        course_id: CourseId(course),
    }
}

fn timetable(id: u32) -> Timetable {
    Timetable {
        id: TimetableId(id),
        name: "Test timetable".into(),
        semester: "Fall".into(),
        year: 2026,
        academic_half: Default::default(),
        is_active: false,
        generation_metadata: None,
    }
}

fn quick_config() -> GeneratorConfig {
    GeneratorConfig {
        level_budget_secs: 60,
        ..Default::default()
    }
}

fn generate(
    catalogue: &CatalogueSnapshot,
    config: &GeneratorConfig,
) -> (
    anyhow::Result<uni_timetabler::scheduler::GenerationOutcome>,
    MemoryStore,
    RecordingSink,
) {
    let store = MemoryStore::new();
    let sink = RecordingSink::new();
    let registry = RunRegistry::new();
    let mut table = timetable(1);

    let result = Orchestrator::new(catalogue, config, &sink).run(&mut table, &store, &registry);
    (result, store, sink)
}

#[test]
fn single_course_places_all_required_hours_in_preferred_room() {
    // TEST201: 2 consecutive lecture hours plus a 3-hour practical, strict
    // drawing-room preference. Both rooms exist but only D1 is admissible.
    let mut test_course = course(1, "TEST201", 2, 2, 0, 3, RoomKind::DrawingRoom);
    test_course.session_config.requires_consecutive = 2;

    let catalogue = CatalogueSnapshot::from_data(CatalogueData {
        courses: vec![test_course],
        lecturers: vec![lecturer(1)],
        rooms: vec![room(1, "L1", "lecture_hall"), room(2, "D1", "drawing_room")],
        groups: vec![group(1, 2)],
        lecturer_assignments: vec![teaches(1, 1)],
        group_assignments: vec![attends(1, 1)],
        ..Default::default()
    });

    let config = quick_config();
    let (result, store, sink) = generate(&catalogue, &config);
    let outcome = result.unwrap();

    assert_eq!(outcome.slots.len(), 5);
    assert!(outcome.slots.iter().all(|s| s.room_id == RoomId(2)));
    assert!(outcome
        .slots
        .iter()
        .all(|s| s.course_id == CourseId(1)
            && s.lecturer_id == LecturerId(1)
            && s.group_id == GroupId(1)));

    // The expanded records re-aggregate into one 2-hour lecture block and
    // one 3-hour practical block
    let blocks = reassemble_blocks(&outcome.slots, &config.grid());
    let mut durations: Vec<(SessionType, u8)> = blocks
        .iter()
        .map(|b| (b.session_type, b.duration))
        .collect();
    durations.sort();
    assert_eq!(
        durations,
        vec![(SessionType::Lecture, 2), (SessionType::Practical, 3)]
    );

    let report = validate_slots(&outcome.slots, &catalogue, &config.grid());
    assert!(report.is_valid, "violations: {:?}", report.hard_violations);

    // Committed exactly once, with generation metadata stamped
    let docs = store.documents();
    assert_eq!(docs.len(), 1);
    let meta = docs[0].timetable.generation_metadata.as_ref().unwrap();
    assert!(meta.generated);
    assert_eq!(meta.levels_processed, vec![5, 4, 3, 2]);

    // Progress percentages never decrease
    let events = sink.events();
    let percentages: Vec<f64> = events.iter().map(|e| e.percentage).collect();
    assert!(percentages.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(events.last().unwrap().status, ProgressStatus::Completed);
    assert_eq!(events.last().unwrap().percentage, 100.0);
}

#[test]
fn two_courses_sharing_the_only_lab_never_collide() {
    let catalogue = CatalogueSnapshot::from_data(CatalogueData {
        courses: vec![
            course(1, "GEN205", 2, 0, 0, 3, RoomKind::Lab),
            course(2, "GEN207", 2, 0, 0, 3, RoomKind::Lab),
        ],
        lecturers: vec![lecturer(1), lecturer(2)],
        rooms: vec![room(1, "LAB1", "computer lab")],
        groups: vec![group(1, 2), group(2, 2)],
        lecturer_assignments: vec![teaches(1, 1), teaches(2, 2)],
        group_assignments: vec![attends(1, 1), attends(2, 2)],
        ..Default::default()
    });

    let config = quick_config();
    let (result, _, _) = generate(&catalogue, &config);
    let outcome = result.unwrap();

    assert_eq!(outcome.slots.len(), 6);
    let report = validate_slots(&outcome.slots, &catalogue, &config.grid());
    assert!(report.is_valid, "violations: {:?}", report.hard_violations);
}

#[test]
fn early_morning_avoidance_keeps_first_slot_free() {
    let mut avoider = lecturer(1);
    avoider.preferences.avoid_early_morning = true;

    let catalogue = CatalogueSnapshot::from_data(CatalogueData {
        courses: vec![course(1, "GEN203", 2, 1, 0, 0, RoomKind::LectureHall)],
        lecturers: vec![avoider],
        rooms: vec![room(1, "L1", "lecture_hall")],
        groups: vec![group(1, 2)],
        lecturer_assignments: vec![teaches(1, 1)],
        group_assignments: vec![attends(1, 1)],
        ..Default::default()
    });

    let config = quick_config();
    let (result, _, _) = generate(&catalogue, &config);
    let outcome = result.unwrap();

    // Plenty of alternatives exist, so the 07:00 slot costs strictly more
    assert_eq!(outcome.objective, 0.0);
    let seven = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
    assert!(outcome.slots.iter().all(|s| s.start_time != seven));
}

#[test]
fn frozen_level_five_slots_are_never_reused_by_level_four() {
    // Both levels need 30 of the 60 cells of the only room: level 4 can
    // only succeed if it sees level 5's placements as obstacles.
    let catalogue = CatalogueSnapshot::from_data(CatalogueData {
        courses: vec![
            course(1, "AEN501", 5, 30, 0, 0, RoomKind::LectureHall),
            course(2, "AEN401", 4, 30, 0, 0, RoomKind::LectureHall),
        ],
        lecturers: vec![lecturer(1), lecturer(2)],
        rooms: vec![room(1, "L1", "lecture_hall")],
        groups: vec![group(1, 5), group(2, 4)],
        lecturer_assignments: vec![teaches(1, 1), teaches(2, 2)],
        group_assignments: vec![attends(1, 1), attends(2, 2)],
        ..Default::default()
    });

    let config = quick_config();
    let (result, _, _) = generate(&catalogue, &config);
    let outcome = result.unwrap();

    assert_eq!(outcome.slots.len(), 60);

    let mut cells: Vec<(u8, NaiveTime)> = outcome
        .slots
        .iter()
        .map(|s| (s.day_of_week, s.start_time))
        .collect();
    cells.sort();
    cells.dedup();
    assert_eq!(cells.len(), 60, "level 4 reused a frozen cell");

    let report = validate_slots(&outcome.slots, &catalogue, &config.grid());
    assert!(report.is_valid, "violations: {:?}", report.hard_violations);
}

#[test]
fn unavailability_tighter_than_requirements_is_infeasible() {
    // One lecturer free for a single hour a week, but two one-hour
    // lectures to teach: nothing can be persisted.
    let all_day = |day: u8, from: (u32, u32), to: (u32, u32)| UnavailabilityWindow {
        lecturer_id: LecturerId(1),
        day_of_week: day,
        start_time: NaiveTime::from_hms_opt(from.0, from.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(to.0, to.1, 0).unwrap(),
    };
    let mut unavailability = vec![all_day(0, (7, 0), (10, 0)), all_day(0, (11, 0), (19, 0))];
    for day in 1..5 {
        unavailability.push(all_day(day, (7, 0), (19, 0)));
    }

    let catalogue = CatalogueSnapshot::from_data(CatalogueData {
        courses: vec![
            course(1, "AEN201", 2, 1, 0, 0, RoomKind::LectureHall),
            course(2, "AEN203", 2, 1, 0, 0, RoomKind::LectureHall),
        ],
        lecturers: vec![lecturer(1)],
        rooms: vec![room(1, "L1", "lecture_hall")],
        groups: vec![group(1, 2)],
        lecturer_assignments: vec![teaches(1, 1), teaches(1, 2)],
        group_assignments: vec![attends(1, 1), attends(1, 2)],
        unavailability,
        ..Default::default()
    });

    let config = quick_config();
    let (result, store, sink) = generate(&catalogue, &config);

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GeneratorError>(),
        Some(GeneratorError::LevelInfeasible { level: 2 })
    ));
    assert!(store.documents().is_empty(), "partial timetable persisted");

    let events = sink.events();
    assert!(events
        .iter()
        .any(|e| e.status == ProgressStatus::Failed && e.level == 2));
    assert_eq!(events.last().unwrap().status, ProgressStatus::Error);
}

#[test]
fn repeated_runs_reproduce_the_objective() {
    let mut early_avoider = lecturer(1);
    early_avoider.preferences.avoid_early_morning = true;
    let mut late_avoider = lecturer(2);
    late_avoider.preferences.avoid_late_afternoon = true;

    let data = || CatalogueData {
        courses: vec![
            course(1, "GEN201", 2, 3, 2, 0, RoomKind::LectureHall),
            course(2, "GEN203", 2, 2, 0, 3, RoomKind::Lab),
        ],
        lecturers: vec![early_avoider.clone(), late_avoider.clone()],
        rooms: vec![room(1, "L1", "lecture_hall"), room(2, "LAB1", "computer lab")],
        groups: vec![group(1, 2)],
        lecturer_assignments: vec![teaches(1, 1), teaches(2, 2)],
        group_assignments: vec![attends(1, 1), attends(1, 2)],
        ..Default::default()
    };

    let config = quick_config();
    let (first, _, _) = generate(&CatalogueSnapshot::from_data(data()), &config);
    let (second, _, _) = generate(&CatalogueSnapshot::from_data(data()), &config);

    assert_eq!(
        first.unwrap().objective,
        second.unwrap().objective,
        "same input must reproduce the same objective"
    );
}

#[test]
fn levels_without_courses_are_skipped_successfully() {
    let catalogue = CatalogueSnapshot::from_data(CatalogueData {
        courses: vec![course(1, "AEN301", 3, 2, 0, 0, RoomKind::LectureHall)],
        lecturers: vec![lecturer(1)],
        rooms: vec![room(1, "L1", "lecture_hall")],
        groups: vec![group(1, 3)],
        lecturer_assignments: vec![teaches(1, 1)],
        group_assignments: vec![attends(1, 1)],
        ..Default::default()
    });

    let config = quick_config();
    let (result, _, sink) = generate(&catalogue, &config);
    let outcome = result.unwrap();

    assert_eq!(outcome.slots.len(), 2);

    // Levels 5, 4 and 2 complete without solving
    let events = sink.events();
    for level in [5u8, 4, 2] {
        assert!(events
            .iter()
            .any(|e| e.level == level && e.status == ProgressStatus::Completed));
        assert!(!events
            .iter()
            .any(|e| e.level == level && e.status == ProgressStatus::Solving));
    }
}

#[test]
fn cancelled_run_commits_nothing() {
    let catalogue = CatalogueSnapshot::from_data(CatalogueData {
        courses: vec![course(1, "GEN201", 2, 2, 0, 0, RoomKind::LectureHall)],
        lecturers: vec![lecturer(1)],
        rooms: vec![room(1, "L1", "lecture_hall")],
        groups: vec![group(1, 2)],
        lecturer_assignments: vec![teaches(1, 1)],
        group_assignments: vec![attends(1, 1)],
        ..Default::default()
    });

    let config = quick_config();
    let store = MemoryStore::new();
    let sink = RecordingSink::new();
    let registry = RunRegistry::new();
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut table = timetable(1);
    let result = Orchestrator::new(&catalogue, &config, &sink)
        .with_cancel(cancel)
        .run(&mut table, &store, &registry);

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GeneratorError>(),
        Some(GeneratorError::Cancelled)
    ));
    assert!(store.documents().is_empty());
    assert_eq!(sink.events().last().unwrap().status, ProgressStatus::Error);
}

#[test]
fn concurrent_runs_on_one_timetable_are_rejected() {
    let catalogue = CatalogueSnapshot::from_data(CatalogueData::default());
    let config = quick_config();
    let store = MemoryStore::new();
    let sink = RecordingSink::new();
    let registry = RunRegistry::new();

    // Simulate an in-flight run holding the registry entry
    let guard = registry.try_begin(TimetableId(1)).unwrap();

    let mut table = timetable(1);
    let result = Orchestrator::new(&catalogue, &config, &sink).run(&mut table, &store, &registry);

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GeneratorError>(),
        Some(GeneratorError::GenerationInProgress(TimetableId(1)))
    ));

    drop(guard);
    // Released: the same timetable can now generate (trivially, empty)
    let mut table = timetable(1);
    assert!(Orchestrator::new(&catalogue, &config, &sink)
        .run(&mut table, &store, &registry)
        .is_ok());
}

#[test]
fn persistence_failure_aborts_with_error_event() {
    struct FailingStore;

    impl PersistenceSink for FailingStore {
        fn commit(&self, _: &Timetable, _: &[PlacedSlot]) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
        fn activate(&self, _: TimetableId) -> anyhow::Result<()> {
            Ok(())
        }
        fn load(
            &self,
            _: TimetableId,
        ) -> anyhow::Result<Option<uni_timetabler::store::TimetableDocument>> {
            Ok(None)
        }
    }

    let catalogue = CatalogueSnapshot::from_data(CatalogueData {
        courses: vec![course(1, "GEN201", 2, 1, 0, 0, RoomKind::LectureHall)],
        lecturers: vec![lecturer(1)],
        rooms: vec![room(1, "L1", "lecture_hall")],
        groups: vec![group(1, 2)],
        lecturer_assignments: vec![teaches(1, 1)],
        group_assignments: vec![attends(1, 1)],
        ..Default::default()
    });

    let config = quick_config();
    let sink = RecordingSink::new();
    let registry = RunRegistry::new();
    let mut table = timetable(1);

    let result =
        Orchestrator::new(&catalogue, &config, &sink).run(&mut table, &FailingStore, &registry);

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GeneratorError>(),
        Some(GeneratorError::Persistence { .. })
    ));
    assert_eq!(sink.events().last().unwrap().status, ProgressStatus::Error);
}
