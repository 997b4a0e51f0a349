// rules.rs - Closed catalog of life-like rules and their aliases

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::UnknownRule;
use crate::grid::{ALIVE, Cell, DEAD, Neighbor};

/// Caller-supplied transition: (cell, live neighbor count, neighbors) -> next cell.
pub type RuleFn = fn(Cell, u32, &[Neighbor]) -> Cell;

/// A cell transition function over the Moore neighborhood.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Birth/survival rule; bit `n` of a mask is set when a count of `n` applies.
    Totalistic { birth: u16, survival: u16 },
    /// Alive exactly when the live count is odd.
    Replicator,
    /// Alive exactly when live count plus own state is odd.
    Fredkin,
    /// Anything not expressible above, e.g. rules that look at neighbor positions.
    Custom(RuleFn),
}

impl Rule {
    /// Builds a birth/survival rule from neighbor counts. Counts above 8 are ignored.
    pub const fn from_counts(birth: &[u8], survival: &[u8]) -> Self {
        Rule::Totalistic {
            birth: mask(birth),
            survival: mask(survival),
        }
    }

    pub const fn conway() -> Self {
        Self::from_counts(&[3], &[2, 3])
    }

    pub fn apply(&self, cell: Cell, live_count: u32, neighbors: &[Neighbor]) -> Cell {
        let alive = cell != DEAD;
        let next = match *self {
            Rule::Totalistic { birth, survival } => {
                let set = if alive { survival } else { birth };
                live_count < 9 && set & (1 << live_count) != 0
            }
            Rule::Replicator => live_count % 2 == 1,
            Rule::Fredkin => (live_count + u32::from(cell)) % 2 == 1,
            Rule::Custom(f) => return f(cell, live_count, neighbors),
        };
        if next { ALIVE } else { DEAD }
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule::conway()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Totalistic { birth, survival } => {
                write!(f, "B{}/S{}", digits(*birth), digits(*survival))
            }
            Rule::Replicator => f.write_str("Replicator"),
            Rule::Fredkin => f.write_str("Fredkin"),
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

const fn mask(counts: &[u8]) -> u16 {
    let mut bits = 0u16;
    let mut i = 0;
    while i < counts.len() {
        if counts[i] <= 8 {
            bits |= 1 << counts[i];
        }
        i += 1;
    }
    bits
}

fn digits(bits: u16) -> String {
    (0..=8u8).filter(|n| bits & (1 << n) != 0).map(|n| char::from(b'0' + n)).collect()
}

/// One named rule with every string it can be requested by.
#[derive(Debug)]
pub struct RuleEntry {
    pub name: &'static str,
    pub notation: &'static str,
    pub aliases: &'static [&'static str],
    pub rule: Rule,
}

static ENTRIES: &[RuleEntry] = &[
    RuleEntry {
        name: "Conway's Life",
        notation: "B3/S23",
        aliases: &["B3/S23", "23/3", "conway", "conways life"],
        rule: Rule::conway(),
    },
    RuleEntry {
        name: "Replicator",
        notation: "B1357/S1357",
        aliases: &["B1357/S1357", "1357/1357", "replicator"],
        rule: Rule::Replicator,
    },
    RuleEntry {
        name: "Fredkin",
        notation: "B1357/S02468",
        aliases: &["B1357/S02468", "02468/1357", "fredkin"],
        rule: Rule::Fredkin,
    },
    RuleEntry {
        name: "Seeds",
        notation: "B2/S",
        aliases: &["B2/S", "/2", "seeds"],
        rule: Rule::from_counts(&[2], &[]),
    },
    RuleEntry {
        name: "Live Free or Die",
        notation: "B2/S0",
        aliases: &["B2/S0", "0/2", "live free or die"],
        rule: Rule::from_counts(&[2], &[0]),
    },
    RuleEntry {
        name: "Life without Death",
        notation: "B3/S012345678",
        aliases: &["B3/S012345678", "012345678/3", "life without death"],
        rule: Rule::from_counts(&[3], &[0, 1, 2, 3, 4, 5, 6, 7, 8]),
    },
    RuleEntry {
        name: "Maze",
        notation: "B3/S12345",
        aliases: &["B3/S12345", "12345/3", "maze"],
        rule: Rule::from_counts(&[3], &[1, 2, 3, 4, 5]),
    },
    RuleEntry {
        name: "Mazectric",
        notation: "B3/S1234",
        aliases: &["B3/S1234", "1234/3", "mazectric"],
        rule: Rule::from_counts(&[3], &[1, 2, 3, 4]),
    },
    RuleEntry {
        name: "2x2",
        notation: "B36/S125",
        aliases: &["B36/S125", "125/36", "two by two", "2x2"],
        rule: Rule::from_counts(&[3, 6], &[1, 2, 5]),
    },
    RuleEntry {
        name: "HighLife",
        notation: "B36/S23",
        aliases: &["B36/S23", "23/36", "high life"],
        rule: Rule::from_counts(&[3, 6], &[2, 3]),
    },
    RuleEntry {
        name: "Move",
        notation: "B368/S245",
        aliases: &["B368/S245", "245/368", "move"],
        rule: Rule::from_counts(&[3, 6, 8], &[2, 4, 5]),
    },
    RuleEntry {
        name: "Day & Night",
        notation: "B3678/S34678",
        aliases: &["B3678/S34678", "B3678/34678", "34678/3678", "day and night"],
        rule: Rule::from_counts(&[3, 6, 7, 8], &[3, 4, 6, 7, 8]),
    },
    RuleEntry {
        name: "DryLife",
        notation: "B37/S23",
        aliases: &["B37/S23", "23/37", "dry life"],
        rule: Rule::from_counts(&[3, 7], &[2, 3]),
    },
    RuleEntry {
        name: "Pedestrian Life",
        notation: "B38/S23",
        aliases: &["B38/S23", "23/38", "pedestrian life"],
        rule: Rule::from_counts(&[3, 8], &[2, 3]),
    },
];

static CATALOG: Lazy<RuleCatalog> = Lazy::new(|| RuleCatalog::new(ENTRIES));

/// Alias lookup over a fixed set of rules. Aliases are folded to lower case
/// when the catalog is built, so resolution is one case-insensitive lookup.
pub struct RuleCatalog {
    entries: &'static [RuleEntry],
    by_alias: HashMap<String, usize>,
}

impl RuleCatalog {
    fn new(entries: &'static [RuleEntry]) -> Self {
        let mut by_alias = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            for alias in entry.aliases {
                let previous = by_alias.insert(alias.to_lowercase(), index);
                debug_assert!(previous.is_none(), "alias `{alias}` registered twice");
            }
        }
        Self { entries, by_alias }
    }

    /// The built-in catalog.
    pub fn builtin() -> &'static RuleCatalog {
        &CATALOG
    }

    pub fn entries(&self) -> &'static [RuleEntry] {
        self.entries
    }

    pub fn lookup(&self, name: &str) -> Result<&'static RuleEntry, UnknownRule> {
        let entries = self.entries;
        self.by_alias
            .get(&name.to_lowercase())
            .map(|&index| &entries[index])
            .ok_or_else(|| UnknownRule(name.to_string()))
    }

    pub fn resolve(&self, name: &str) -> Result<Rule, UnknownRule> {
        self.lookup(name).map(|entry| entry.rule)
    }
}

impl std::str::FromStr for Rule {
    type Err = UnknownRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleCatalog::builtin().resolve(s)
    }
}
