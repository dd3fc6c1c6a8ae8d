use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Course subject shared by video subjects and material categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "Data Structures")]
    DataStructures,
    Programming,
    #[serde(rename = "DBMS")]
    Dbms,
    Algorithms,
    #[serde(rename = "Operating Systems")]
    OperatingSystems,
    Networking,
    Other,
}

impl Subject {
    pub const ALL: [Subject; 7] = [
        Subject::DataStructures,
        Subject::Programming,
        Subject::Dbms,
        Subject::Algorithms,
        Subject::OperatingSystems,
        Subject::Networking,
        Subject::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::DataStructures => "Data Structures",
            Subject::Programming => "Programming",
            Subject::Dbms => "DBMS",
            Subject::Algorithms => "Algorithms",
            Subject::OperatingSystems => "Operating Systems",
            Subject::Networking => "Networking",
            Subject::Other => "Other",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| format!("`{}` is not a valid subject", s))
    }
}
