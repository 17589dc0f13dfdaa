use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use uni_timetabler::catalogue::{load_catalogue_from_dir, load_config_or_default, validate_catalogue};
use uni_timetabler::progress::ConsoleSink;
use uni_timetabler::scheduler::{Orchestrator, RunRegistry};
use uni_timetabler::store::{JsonStore, PersistenceSink};
use uni_timetabler::types::{AcademicHalf, Timetable, TimetableId};
use uni_timetabler::validator::{validate_slots, ValidationReport};

#[derive(Parser)]
#[command(name = "uni-timetabler")]
#[command(about = "Constraint-based university timetable generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run demo with sample catalogue data
    Demo,

    /// Generate a timetable from a catalogue directory
    Generate {
        /// Directory containing catalogue JSON files and config.toml
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory for timetable documents
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Timetable id to generate under
        #[arg(long, default_value_t = 1)]
        id: u32,

        /// Timetable display name
        #[arg(long, default_value = "Generated timetable")]
        name: String,

        /// Semester label
        #[arg(long, default_value = "Fall")]
        semester: String,

        /// Academic year
        #[arg(long, default_value_t = 2026)]
        year: u16,

        /// Schedule the second half of the academic year
        #[arg(long)]
        second_half: bool,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Validate a persisted timetable against its catalogue
    Validate {
        /// Directory containing timetable documents
        #[arg(short, long)]
        output: PathBuf,

        /// Timetable id to validate
        #[arg(long)]
        id: u32,

        /// Directory containing catalogue JSON files
        #[arg(short, long)]
        data: PathBuf,

        /// Show detailed statistics
        #[arg(short, long)]
        verbose: bool,
    },

    /// Mark one timetable active and clear the flag on all others
    Activate {
        /// Directory containing timetable documents
        #[arg(short, long)]
        output: PathBuf,

        /// Timetable id to activate
        #[arg(long)]
        id: u32,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => run_demo(),
        Commands::Generate {
            data,
            output,
            id,
            name,
            semester,
            year,
            second_half,
            quiet,
        } => run_generate(&data, &output, id, name, semester, year, second_half, quiet),
        Commands::Validate {
            output,
            id,
            data,
            verbose,
        } => run_validate(&output, id, &data, verbose),
        Commands::Activate { output, id } => run_activate(&output, id),
    }
}

fn run_demo() -> Result<()> {
    println!("{}", "Uni Timetabler Demo".bold().cyan());
    println!("{}", "─".repeat(40));

    let demo_path = PathBuf::from("data/demo");
    if !demo_path.join("courses.json").exists() {
        println!("{}", "Demo data not found. Creating sample data...".yellow());
        create_demo_data(&demo_path)?;
    }

    run_generate(
        &demo_path,
        &PathBuf::from("output"),
        1,
        "Demo timetable".into(),
        "Fall".into(),
        2026,
        false,
        false,
    )
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    data: &PathBuf,
    output: &PathBuf,
    id: u32,
    name: String,
    semester: String,
    year: u16,
    second_half: bool,
    quiet: bool,
) -> Result<()> {
    let catalogue = load_catalogue_from_dir(data).context("Failed to load catalogue")?;
    let config = load_config_or_default(&data.join("config.toml"))?;

    let validation = validate_catalogue(&catalogue)?;
    for warning in &validation.warnings {
        println!("{} {}", "Warning:".yellow(), warning);
    }

    if !quiet {
        println!(
            "Loaded {} courses, {} lecturers, {} rooms, {} groups",
            catalogue.courses().len(),
            catalogue.lecturers().len(),
            catalogue.rooms().len(),
            catalogue.groups().len()
        );
        println!("\nGenerating timetable...\n");
    }

    let mut timetable = Timetable {
        id: TimetableId(id),
        name,
        semester,
        year,
        academic_half: if second_half {
            AcademicHalf::SecondHalf
        } else {
            AcademicHalf::FirstHalf
        },
        is_active: false,
        generation_metadata: None,
    };

    let store = JsonStore::new(output);
    let registry = RunRegistry::new();
    let sink = ConsoleSink::new(quiet);

    let outcome = Orchestrator::new(&catalogue, &config, &sink).run(&mut timetable, &store, &registry)?;
    sink.finish();

    let report = validate_slots(&outcome.slots, &catalogue, &config.grid());
    print_summary(outcome.slots.len(), outcome.objective, &report);

    println!(
        "Timetable written to: {}",
        output.display().to_string().green()
    );

    Ok(())
}

fn run_validate(output: &PathBuf, id: u32, data: &PathBuf, verbose: bool) -> Result<()> {
    let catalogue = load_catalogue_from_dir(data)?;
    let config = load_config_or_default(&data.join("config.toml"))?;

    let store = JsonStore::new(output);
    let doc = store
        .load(TimetableId(id))?
        .with_context(|| format!("timetable {id} not found in {}", output.display()))?;

    let report = validate_slots(&doc.slots, &catalogue, &config.grid());

    if report.is_valid {
        println!("{}", "✓ Timetable is valid".green().bold());
    } else {
        println!("{}", "✗ Timetable has violations".red().bold());
        for v in &report.hard_violations {
            println!("  - {}: {}", v.constraint.red(), v.message);
        }
    }

    if verbose {
        println!("\n{}", "Statistics:".bold());
        println!("  Hour slots: {}", report.statistics.total_slots);
        println!("  Courses scheduled: {}", report.statistics.courses_scheduled);
        println!("  Lecturers used: {}", report.statistics.lecturers_used);
        println!("  Rooms used: {}", report.statistics.rooms_used);
        if let Some(meta) = &doc.timetable.generation_metadata {
            println!(
                "  Generated at {} (levels {:?})",
                meta.generated_at, meta.levels_processed
            );
        }
    }

    println!("\nPreference penalty: {}", report.preference_penalty);

    Ok(())
}

fn run_activate(output: &PathBuf, id: u32) -> Result<()> {
    let store = JsonStore::new(output);
    store.activate(TimetableId(id))?;
    println!("{}", format!("✓ Timetable {id} is now active").green().bold());
    Ok(())
}

fn print_summary(total_slots: usize, objective: f64, report: &ValidationReport) {
    println!("\n{}", "Generation Summary".bold());
    println!("{}", "─".repeat(40));
    println!("Hour slots placed: {}", total_slots);
    println!("Objective (preference penalty): {:.0}", objective);

    if report.is_valid {
        println!("{}", "All hard constraints satisfied".green());
    } else {
        println!(
            "{}",
            format!("{} hard violations!", report.hard_violations.len()).red()
        );
    }
}

fn create_demo_data(path: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(path)?;

    let departments = serde_json::json!([
        {"id": 1, "name": "Architectural Engineering", "code": "AEN"},
        {"id": 2, "name": "General Engineering", "code": "GEN"}
    ]);
    std::fs::write(
        path.join("departments.json"),
        serde_json::to_string_pretty(&departments)?,
    )?;

    let courses = serde_json::json!([
        {"id": 1, "code": "GEN201", "name": "Engineering Drawing", "department_id": 2, "level": 2,
         "credits": 3, "lecture_hours": 2, "tutorial_hours": 0, "practical_hours": 3,
         "preferred_room_type": "drawing_room", "session_config": {"requires_consecutive": 2}},
        {"id": 2, "code": "GEN203", "name": "Engineering Mathematics", "department_id": 2, "level": 2,
         "credits": 4, "lecture_hours": 3, "tutorial_hours": 2, "practical_hours": 0,
         "preferred_room_type": "lecture_hall"},
        {"id": 3, "code": "AEN301", "name": "Structural Analysis", "department_id": 1, "level": 3,
         "credits": 3, "lecture_hours": 2, "tutorial_hours": 1, "practical_hours": 0,
         "preferred_room_type": "lecture_hall", "session_config": {"requires_consecutive": true}},
        {"id": 4, "code": "AEN305", "name": "Surveying", "department_id": 1, "level": 3,
         "credits": 3, "lecture_hours": 2, "tutorial_hours": 0, "practical_hours": 3,
         "preferred_room_type": "surveying_room"},
        {"id": 5, "code": "GEN205", "name": "Computer Programming", "department_id": 2, "level": 2,
         "credits": 2, "lecture_hours": 1, "tutorial_hours": 0, "practical_hours": 2,
         "preferred_room_type": "lab"}
    ]);
    std::fs::write(
        path.join("courses.json"),
        serde_json::to_string_pretty(&courses)?,
    )?;

    let lecturers = serde_json::json!([
        {"id": 1, "staff_number": "ST-014", "name": "Dr. Amal Hassan", "email": "a.hassan@example.edu",
         "department_id": 2, "max_hours_per_week": 16,
         "preferences": {"avoid_early_morning": true}},
        {"id": 2, "staff_number": "ST-022", "name": "Prof. Omar Farouk", "email": "o.farouk@example.edu",
         "department_id": 1, "max_hours_per_week": 12,
         "preferences": {"avoid_late_afternoon": true}},
        {"id": 3, "staff_number": "ST-031", "name": "Dr. Mona Said", "email": "m.said@example.edu",
         "department_id": 2, "max_hours_per_week": 18}
    ]);
    std::fs::write(
        path.join("lecturers.json"),
        serde_json::to_string_pretty(&lecturers)?,
    )?;

    let rooms = serde_json::json!([
        {"id": 1, "name": "L1", "building": "Main", "capacity": 120, "room_type": "lecture_hall",
         "room_category": "lecture_hall_large", "priority": "high"},
        {"id": 2, "name": "L2", "building": "Main", "capacity": 60, "room_type": "lecture_hall",
         "room_category": "lecture_hall_medium"},
        {"id": 3, "name": "D1", "building": "Annex", "capacity": 40, "room_type": "drawing_room",
         "room_category": "drawing_room", "equipment": ["drawing boards"]},
        {"id": 4, "name": "LAB1", "building": "Annex", "capacity": 30, "room_type": "computer lab",
         "room_category": "computer_lab", "equipment": ["workstations"]},
        {"id": 5, "name": "SV1", "building": "Field", "capacity": 30, "room_type": "surveying_room",
         "room_category": "surveying_room"}
    ]);
    std::fs::write(path.join("rooms.json"), serde_json::to_string_pretty(&rooms)?)?;

    let groups = serde_json::json!([
        {"id": 1, "name": "Level 2 - A", "level": 2, "department_id": 2, "size": 45,
         "display_code": "2A"},
        {"id": 2, "name": "Level 3 - AEN", "level": 3, "department_id": 1, "size": 35,
         "display_code": "3A"}
    ]);
    std::fs::write(
        path.join("groups.json"),
        serde_json::to_string_pretty(&groups)?,
    )?;

    let lecturer_assignments = serde_json::json!([
        {"lecturer_id": 1, "course_id": 1},
        {"lecturer_id": 1, "course_id": 2},
        {"lecturer_id": 2, "course_id": 3},
        {"lecturer_id": 2, "course_id": 4},
        {"lecturer_id": 3, "course_id": 5}
    ]);
    std::fs::write(
        path.join("lecturer_assignments.json"),
        serde_json::to_string_pretty(&lecturer_assignments)?,
    )?;

    let group_assignments = serde_json::json!([
        {"group_id": 1, "course_id": 1},
        {"group_id": 1, "course_id": 2},
        {"group_id": 1, "course_id": 5},
        {"group_id": 2, "course_id": 3},
        {"group_id": 2, "course_id": 4}
    ]);
    std::fs::write(
        path.join("group_assignments.json"),
        serde_json::to_string_pretty(&group_assignments)?,
    )?;

    let unavailability = serde_json::json!([
        {"lecturer_id": 2, "day_of_week": 4, "start_time": "13:00:00", "end_time": "19:00:00"}
    ]);
    std::fs::write(
        path.join("unavailability.json"),
        serde_json::to_string_pretty(&unavailability)?,
    )?;

    println!("{}", "Demo data created successfully!".green());
    Ok(())
}
