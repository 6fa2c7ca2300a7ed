//! FBref "Big 5 European Leagues" 球員資料的內建設定

use crate::config::{
    ExportSettings, FetchSettings, MetadataSettings, PipelineConfig, Season, TransformSettings,
};
use crate::domain::model::ColumnDescription;
use crate::domain::ports::SourceSpec;

pub const PRIMARY_TABLE: &str = "stats_standard";
pub const ENTITY_COLUMN: &str = "Player";
pub const GROUP_COLUMN: &str = "Squad";
/// 發佈目標是同一個資料集，新賽季以新版本上傳；要換資料集請在設定檔覆寫 `metadata.dataset_id`
pub const DATASET_ID: &str = "hubertsidorowicz/football-players-stats-2025-2026";
pub const METADATA_FILE_NAME: &str = "dataset-metadata.json";
pub const OUTPUT_DIR: &str = "kaggle_upload";

const FBREF_BASE: &str = "https://fbref.com/en/comps/Big5";

/// (頁面路徑, 表格 id)，順序即合併順序
pub const FBREF_SOURCES: &[(&str, &str)] = &[
    ("stats", "stats_standard"),
    ("shooting", "stats_shooting"),
    ("passing", "stats_passing"),
    ("passing_types", "stats_passing_types"),
    ("gca", "stats_gca"),
    ("defense", "stats_defense"),
    ("possession", "stats_possession"),
    ("playingtime", "stats_playing_time"),
    ("misc", "stats_misc"),
    ("keepers", "stats_keeper"),
    ("keepersadv", "stats_keeper_adv"),
];

/// 精簡版輸出的欄位，含合併時加上表格後綴的欄位
pub const LIGHT_COLUMNS: &[&str] = &[
    "Rk", "Player", "Nation", "Pos", "Squad", "Comp", "Age", "Born", "MP", "Starts", "Min",
    "90s", "Gls", "Ast", "G+A", "G-PK", "PK", "PKatt", "CrdY", "CrdR", "xG", "npxG", "xAG",
    "npxG+xAG", "G+A-PK", "xG+xAG", "PrgC", "PrgP", "PrgR", "Sh", "SoT", "SoT%", "Sh/90",
    "SoT/90", "G/Sh", "G/SoT", "Dist", "FK", "PK_stats_shooting", "PKatt_stats_shooting",
    "xG_stats_shooting", "npxG_stats_shooting", "npxG/Sh", "G-xG", "np:G-xG", "Cmp", "Att",
    "Cmp%", "TotDist", "PrgDist", "Ast_stats_passing", "xAG_stats_passing", "xA", "A-xAG",
    "KP", "1/3", "PPA", "CrsPA", "PrgP_stats_passing", "Live", "Dead",
    "FK_stats_passing_types", "TB", "Sw", "Crs", "TI", "CK", "In", "Out", "Str",
    "Cmp_stats_passing_types", "Tkl", "TklW", "Def 3rd", "Mid 3rd", "Att 3rd",
    "Att_stats_defense", "Tkl%", "Lost", "Blocks_stats_defense", "Sh_stats_defense", "Pass",
    "Int", "Tkl+Int", "Clr", "Err", "SCA", "SCA90", "PassLive", "PassDead", "TO",
    "Sh_stats_gca", "Fld", "Def", "GCA", "GCA90", "Touches", "Def Pen",
    "Def 3rd_stats_possession", "Mid 3rd_stats_possession", "Att 3rd_stats_possession",
    "Att Pen", "Live_stats_possession", "Att_stats_possession", "Succ", "Succ%", "Tkld",
    "Tkld%", "Carries", "TotDist_stats_possession", "PrgDist_stats_possession",
    "PrgC_stats_possession", "1/3_stats_possession", "CPA", "Mis", "Dis", "Rec",
    "PrgR_stats_possession", "CrdY_stats_misc", "CrdR_stats_misc", "2CrdY", "Fls",
    "Fld_stats_misc", "Off_stats_misc", "Crs_stats_misc", "Int_stats_misc", "TklW_stats_misc",
    "PKwon", "PKcon", "OG", "Recov", "Won", "Lost_stats_misc", "Won%", "GA", "GA90", "SoTA",
    "Saves", "Save%", "W", "D", "L", "CS", "CS%", "PKatt_stats_keeper", "PKA", "PKsv", "PKm",
    "PSxG", "PSxG/SoT", "PSxG+/-", "/90", "Cmp_stats_keeper_adv", "Att_stats_keeper_adv",
    "Cmp%_stats_keeper_adv", "Att (GK)", "Thr", "Launch%", "AvgLen", "Opp", "Stp", "Stp%",
    "#OPA", "#OPA/90", "AvgDist",
];

pub const COLUMN_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Rk", "Ranking of the player"),
    ("Player", "Name of the player"),
    ("Nation", "Nationality of the player"),
    ("Pos", "Position on the field"),
    ("Squad", "Team name"),
    ("Comp", "League competition"),
    ("Age", "Player's age in years"),
    ("Born", "Year of birth"),
    ("MP", "Matches played"),
    ("Starts", "Number of matches started"),
    ("Min", "Total minutes played"),
    ("90s", "Minutes played divided by 90 (full match equivalent)"),
    ("Gls", "Total goals scored"),
    ("Ast", "Total assists"),
    ("G+A", "Total goals and assists"),
    ("G-PK", "Goals excluding penalties"),
    ("PK", "Penalty kicks scored"),
    ("PKatt", "Penalty kick attempts"),
    ("CrdY", "Yellow cards received"),
    ("CrdR", "Red cards received"),
    ("xG", "Expected goals"),
    ("npxG", "Non-penalty expected goals"),
    ("xAG", "Expected assists"),
    ("npxG+xAG", "Sum of non-penalty xG and xAG"),
    ("PrgC", "Progressive carries"),
    ("PrgP", "Progressive passes"),
    ("PrgR", "Progressive runs"),
    ("Sh", "Total shots attempted"),
    ("SoT", "Shots on target"),
    ("SoT%", "Percentage of shots on target"),
    ("Sh/90", "Shots per 90 minutes"),
    ("SoT/90", "Shots on target per 90 minutes"),
    ("G/Sh", "Goals per shot"),
    ("G/SoT", "Goals per shot on target"),
    ("Dist", "Average shot distance (yards)"),
    ("FK", "Free kicks taken"),
    ("Cmp", "Passes completed"),
    ("Att", "Passes attempted"),
    ("Cmp%", "Pass completion percentage"),
    ("TotDist", "Total passing distance (yards)"),
    ("PrgDist", "Progressive passing distance (yards)"),
    ("KP", "Key passes"),
    ("Tkl", "Tackles"),
    ("TklW", "Tackles won"),
    ("Int", "Interceptions"),
    ("Clr", "Clearances"),
    ("SCA", "Shot-creating actions"),
    ("GCA", "Goal-creating actions"),
    ("Touches", "Touches"),
    ("GA", "Goals against (goalkeepers)"),
    ("Saves", "Saves (goalkeepers)"),
    ("Save%", "Save percentage (goalkeepers)"),
    ("CS", "Clean sheets (goalkeepers)"),
    ("PSxG", "Post-shot expected goals (goalkeepers)"),
];

impl PipelineConfig {
    /// 內建的 FBref 設定，檔名與標題依賽季產生
    pub fn fbref_big5(season: Season) -> Self {
        Self {
            season,
            sources: fbref_sources(),
            primary_table: PRIMARY_TABLE.to_string(),
            entity_column: ENTITY_COLUMN.to_string(),
            group_column: GROUP_COLUMN.to_string(),
            identity_column: ENTITY_COLUMN.to_string(),
            light_columns: LIGHT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            fetch: FetchSettings::default(),
            transform: TransformSettings::default(),
            export: default_export(season),
            metadata: default_metadata(season),
        }
    }
}

pub fn fbref_sources() -> Vec<SourceSpec> {
    FBREF_SOURCES
        .iter()
        .map(|(page, id)| {
            SourceSpec::new(
                format!("{}/{}/players/Big-5-European-Leagues-Stats", FBREF_BASE, page),
                *id,
            )
        })
        .collect()
}

pub fn default_export(season: Season) -> ExportSettings {
    ExportSettings {
        output_dir: OUTPUT_DIR.into(),
        full_file_name: format!("players_data-{}.csv", season.file_token()),
        light_file_name: format!("players_data_light-{}.csv", season.file_token()),
        metadata_file_name: METADATA_FILE_NAME.to_string(),
    }
}

pub fn default_metadata(season: Season) -> MetadataSettings {
    MetadataSettings {
        title: format!("Football Players Stats {}", season.label()),
        dataset_id: DATASET_ID.to_string(),
        license: "CC0-1.0".to_string(),
        include_column_descriptions: true,
        columns: column_descriptions(),
        full_file_description: format!(
            "Complete dataset with all player statistics for the {} season.",
            season.label()
        ),
        light_file_description: "Lighter version of the dataset containing only key statistics."
            .to_string(),
        version_notes: format!(
            "Updated statistics for the {} season with column descriptions.",
            season
        ),
    }
}

pub fn column_descriptions() -> Vec<ColumnDescription> {
    COLUMN_DESCRIPTIONS
        .iter()
        .map(|(name, description)| ColumnDescription {
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fbref_sources_start_with_primary_table() {
        let sources = fbref_sources();
        assert_eq!(sources.len(), 11);
        assert_eq!(sources[0].table_id, PRIMARY_TABLE);
        assert_eq!(
            sources[0].url,
            "https://fbref.com/en/comps/Big5/stats/players/Big-5-European-Leagues-Stats"
        );
        assert_eq!(
            sources[10].url,
            "https://fbref.com/en/comps/Big5/keepersadv/players/Big-5-European-Leagues-Stats"
        );
    }

    #[test]
    fn test_light_columns_include_suffixed_names() {
        assert_eq!(LIGHT_COLUMNS.len(), 165);
        assert_eq!(LIGHT_COLUMNS[0], "Rk");
        assert!(LIGHT_COLUMNS.contains(&"PK_stats_shooting"));
        assert!(LIGHT_COLUMNS.contains(&"Cmp%_stats_keeper_adv"));
        assert!(!LIGHT_COLUMNS.iter().any(|c| c.to_lowercase().contains("matches")));
    }

    #[test]
    fn test_season_drives_file_names_and_title() {
        let config = PipelineConfig::fbref_big5(Season::new(2025));
        assert_eq!(config.export.full_file_name, "players_data-2025_2026.csv");
        assert_eq!(config.export.light_file_name, "players_data_light-2025_2026.csv");
        assert_eq!(config.metadata.title, "Football Players Stats 2025-2026");
        assert_eq!(
            config.metadata.dataset_id,
            "hubertsidorowicz/football-players-stats-2025-2026"
        );
        assert!(config.metadata.version_notes.contains("2025/2026"));
    }

    #[test]
    fn test_new_season_publishes_to_the_same_dataset() {
        let config = PipelineConfig::fbref_big5(Season::new(2026));
        assert_eq!(config.metadata.dataset_id, DATASET_ID);
        assert_eq!(config.metadata.title, "Football Players Stats 2026-2027");
        assert_eq!(config.export.full_file_name, "players_data-2026_2027.csv");
    }
}
