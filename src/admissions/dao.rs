//! Data access for students and exams
//!
//! Each call is its own transaction: reads end with `end(false)`, writes with
//! `end(true)`. A failing call leaves the store closed and the file untouched.

use crate::db::{DbResult, JsonDb};

use super::model::{Exam, Student};

pub struct StudentDao<'a> {
    db: &'a mut JsonDb,
}

impl<'a> StudentDao<'a> {
    pub fn new(db: &'a mut JsonDb) -> Self {
        Self { db }
    }

    /// All students, highest id first
    pub fn students(&mut self) -> DbResult<Vec<Student>> {
        let mut students = self.db.transaction(false, |db| db.get_all::<Student>())?;
        students.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(students)
    }

    pub fn find_student(&mut self, id: i32) -> DbResult<Option<Student>> {
        self.db.transaction(false, |db| db.find::<Student>(id))
    }

    /// Stores a new student and assigns its id
    pub fn add_student(&mut self, student: &mut Student) -> DbResult<()> {
        self.db.transaction(true, |db| db.save(student))
    }

    pub fn update_student(&mut self, student: &mut Student) -> DbResult<()> {
        self.db.transaction(true, |db| db.save(student))
    }

    pub fn delete_student(&mut self, student: &Student) -> DbResult<()> {
        self.db.transaction(true, |db| db.delete(Some(student)))
    }
}

pub struct ExamDao<'a> {
    db: &'a mut JsonDb,
}

impl<'a> ExamDao<'a> {
    pub fn new(db: &'a mut JsonDb) -> Self {
        Self { db }
    }

    pub fn exams(&mut self) -> DbResult<Vec<Exam>> {
        self.db.transaction(false, |db| db.get_all::<Exam>())
    }

    pub fn find_exam(&mut self, id: i32) -> DbResult<Option<Exam>> {
        self.db.transaction(false, |db| db.find::<Exam>(id))
    }

    pub fn add_exam(&mut self, exam: &mut Exam) -> DbResult<()> {
        self.db.transaction(true, |db| db.save(exam))
    }

    pub fn update_exam(&mut self, exam: &mut Exam) -> DbResult<()> {
        self.db.transaction(true, |db| db.save(exam))
    }

    pub fn delete_exam(&mut self, exam: &Exam) -> DbResult<()> {
        self.db.transaction(true, |db| db.delete(Some(exam)))
    }

    /// The first stored exam taken by `student`
    pub fn exam_for_student(&mut self, student: &Student) -> DbResult<Option<Exam>> {
        let Some(student_id) = student.id else {
            return Ok(None);
        };
        let exams = self.exams()?;
        Ok(exams
            .into_iter()
            .find(|exam| exam.student_id == Some(student_id)))
    }
}
