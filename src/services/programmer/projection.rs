use serde::Serialize;

use crate::database::Programmer;

/// Public shape of a programmer. Identity and ownership stay server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammerView {
    pub nickname: String,
    pub avatar_number: Option<i32>,
    pub power_level: i32,
    pub tag_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgrammerList {
    pub programmers: Vec<ProgrammerView>,
}

impl From<&Programmer> for ProgrammerView {
    fn from(programmer: &Programmer) -> Self {
        Self {
            nickname: programmer.nickname.clone().unwrap_or_default(),
            avatar_number: programmer.avatar_number,
            power_level: programmer.power_level,
            tag_line: programmer.tag_line.clone(),
        }
    }
}

pub fn project(programmer: &Programmer) -> ProgrammerView {
    ProgrammerView::from(programmer)
}

/// Project every programmer, keeping store order
pub fn project_all(programmers: &[Programmer]) -> ProgrammerList {
    ProgrammerList {
        programmers: programmers.iter().map(project).collect(),
    }
}
