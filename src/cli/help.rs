/// One CLI command with its one-line description and usage.
#[derive(Debug, Clone, Copy)]
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "forecast",
        description: "Project the running balance of recurring earnings and expenses",
        usage: "forecast <data-dir> [--days N] [--today YYYY-MM-DD] [--json]",
    },
    CommandEntry {
        name: "timeline",
        description: "List calendar items merged with forecast occurrences",
        usage: "timeline <data-dir> [--days N] [--today YYYY-MM-DD] [--types a,b] [--json]",
    },
    CommandEntry {
        name: "rules",
        description: "Show each recurring rule with its cadence and next due date",
        usage: "rules <data-dir> [--today YYYY-MM-DD]",
    },
    CommandEntry {
        name: "version",
        description: "Print build metadata",
        usage: "version [--json]",
    },
    CommandEntry {
        name: "help",
        description: "Show this overview",
        usage: "help",
    },
];

pub fn usage() -> String {
    let mut text = String::from("Usage: cadence_cli <command> [options]\n\nCommands:\n");
    for entry in COMMANDS {
        text.push_str(&format!("  {:<10} {}\n", entry.name, entry.description));
        text.push_str(&format!("  {:<10}   {}\n", "", entry.usage));
    }
    text.push_str(
        "\nSettings come from <data-dir>/config.json, else the per-user cadence/config.json.\n",
    );
    text.push_str("\nEvent types: event, task, transaction, habit_summary, transaction_summary, forecast\n");
    text
}
