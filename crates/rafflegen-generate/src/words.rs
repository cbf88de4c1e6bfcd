//! Word pools used to build names and mail text.

/// Adjectives for display names.
pub const ADJECTIVES: &[&str] = &[
    "active", "ancient", "bold", "brave", "calm", "clever", "cool", "curious", "daring", "eager",
    "epic", "fast", "gentle", "happy", "keen", "lucky", "mighty", "noble", "proud", "quick",
    "royal", "silent", "swift", "wise", "young", "zealous", "bright", "cosmic", "divine",
    "fierce", "golden", "humble", "iron", "jovial", "kind", "lunar", "magic", "nimble", "ocean",
    "plasma", "quantum", "radiant", "stellar", "thunder", "ultra", "vibrant", "wild", "xenial",
    "yellow", "zesty",
];

/// Nouns for display names.
pub const NOUNS: &[&str] = &[
    "archer", "baker", "crafter", "dancer", "explorer", "fighter", "guardian", "hunter", "knight",
    "mage", "navigator", "oracle", "paladin", "ranger", "scholar", "trader", "warrior", "wizard",
    "alchemist", "bard", "cleric", "druid", "engineer", "forger", "gladiator", "herbalist",
    "inventor", "jeweler", "keeper", "librarian", "merchant", "nomad", "observer", "protector",
    "questor", "runner", "seeker", "templar", "voyager", "weaver", "crystal", "phoenix", "dragon",
    "storm", "shadow", "flame", "frost", "thunder", "lightning", "mystic",
];

/// Guild ranks a roster member can hold.
pub const RANKS: &[&str] = &["Recruit", "Member", "Veteran", "Officer", "Guild Master"];

/// Subjects players type on raffle mail.
pub const MAIL_SUBJECTS: &[&str] = &[
    "tix",
    "tickets",
    "raffle",
    "raffle tickets",
    "weekly raffle",
    "raffle entry",
    "BBC raffle",
    "guild raffle",
    "raffle tix",
    "tickets please",
    "raffle please",
    "",
    "Gold",
    "entry fee",
];

/// Receipt bodies. `<<1>>` is the recipient and `<<2>>` the ticket count;
/// the addon substitutes them, so they stay literal here.
pub const MAIL_BODY_TEMPLATES: &[&str] = &[
    "Hello, <<1>>!\r\n\r\nConfirming your purchase for the Guild Raffle!\r \n\r\nNumber of Tickets Purchased:|cFFD000    <<2>>|r\r\n\r\nAdditional tickets can be purchased until Tuesday Night.\r\n\r\nDrawings are held weekly.",
    "Welcome to the raffle, <<1>>!\r\n\r\nTickets purchased: <<2>>\r\n\r\nGood luck in this week's drawing!",
    "Raffle confirmation for <<1>>\r\n\r\nTickets: <<2>>\r\n\r\nThank you for participating!",
];

/// Receipt subjects paired with [`MAIL_BODY_TEMPLATES`].
pub const MAIL_SUBJECT_TEMPLATES: &[&str] = &[
    ":: |cF5FC24Guild Raffle Receipt|r ::",
    "Raffle Ticket Confirmation",
    "Weekly Raffle Entry Confirmed",
];

/// Uppercase the first character, lowercase nothing else.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
