//! Admissions records

use serde::{Deserialize, Serialize};

use crate::record::{FieldDescriptor, Record, RecordDescriptor};
use crate::schema::{ColumnType, Scalar};

/// An applicant with their grade average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub passed: Option<bool>,
    pub average: Option<f64>,
}

impl Student {
    pub fn new(name: impl Into<String>, passed: bool, average: f64) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            passed: Some(passed),
            average: Some(average),
        }
    }
}

impl Default for Student {
    /// New students count as passed until an exam says otherwise
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            passed: Some(true),
            average: None,
        }
    }
}

static STUDENT_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::key("id"),
    FieldDescriptor::column("name", ColumnType::String),
    FieldDescriptor::column("passed", ColumnType::Boolean),
    FieldDescriptor::column("average", ColumnType::Decimal),
];

static STUDENT: RecordDescriptor = RecordDescriptor {
    type_name: "Student",
    entity: true,
    fields: &STUDENT_FIELDS,
};

impl Record for Student {
    fn descriptor() -> &'static RecordDescriptor {
        &STUDENT
    }

    fn get(&self, field: &str) -> Option<Scalar> {
        match field {
            "id" => self.id.map(Scalar::Int),
            "name" => self.name.clone().map(Scalar::Text),
            "passed" => self.passed.map(Scalar::Bool),
            "average" => self.average.map(Scalar::Decimal),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Option<Scalar>) {
        match field {
            "id" => self.id = value.and_then(|v| v.as_int()),
            "name" => self.name = value.and_then(Scalar::into_text),
            "passed" => self.passed = value.and_then(|v| v.as_bool()),
            "average" => self.average = value.and_then(|v| v.as_decimal()),
            _ => {}
        }
    }
}

/// Admission exam result for one student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: Option<i32>,
    pub mark: Option<f64>,
    pub student_id: Option<i32>,
}

impl Exam {
    pub fn new(mark: f64, student_id: i32) -> Self {
        Self {
            id: None,
            mark: Some(mark),
            student_id: Some(student_id),
        }
    }
}

static EXAM_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::key("id"),
    FieldDescriptor::column("mark", ColumnType::Decimal),
    FieldDescriptor::column("studentId", ColumnType::Int),
];

static EXAM: RecordDescriptor = RecordDescriptor {
    type_name: "Exam",
    entity: true,
    fields: &EXAM_FIELDS,
};

impl Record for Exam {
    fn descriptor() -> &'static RecordDescriptor {
        &EXAM
    }

    fn get(&self, field: &str) -> Option<Scalar> {
        match field {
            "id" => self.id.map(Scalar::Int),
            "mark" => self.mark.map(Scalar::Decimal),
            "studentId" => self.student_id.map(Scalar::Int),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Option<Scalar>) {
        match field {
            "id" => self.id = value.and_then(|v| v.as_int()),
            "mark" => self.mark = value.and_then(|v| v.as_decimal()),
            "studentId" => self.student_id = value.and_then(|v| v.as_int()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_names() {
        assert_eq!(Student::descriptor().entity_name(), "student");
        assert_eq!(Exam::descriptor().entity_name(), "exam");
    }

    #[test]
    fn test_default_student_passes() {
        assert_eq!(Student::default().passed, Some(true));
    }

    #[test]
    fn test_get_set_roundtrip_fields() {
        let mut exam = Exam::default();
        exam.set("studentId", Some(Scalar::Int(4)));
        exam.set("mark", Some(Scalar::Decimal(8.5)));
        assert_eq!(exam.get("studentId"), Some(Scalar::Int(4)));
        assert_eq!(exam.get("mark"), Some(Scalar::Decimal(8.5)));
        assert_eq!(exam.get("unknown"), None);
    }

    #[test]
    fn test_exam_serializes_camel_case() {
        let json = serde_json::to_value(Exam::new(9.0, 2)).unwrap();
        assert_eq!(json["studentId"], 2);
    }
}
