//! Ayurvedic diet chart: the editable record and its printed layout.
//!
//! A chart is a value. Every edit is a pure function from the old chart to a
//! new one ([`DietChart::apply`]); a failed edit leaves the original
//! untouched.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{
    render_sections, ComposeError, Composer, DocumentSection, DownloadableArtifact, PageConfig,
    SectionBody, TextStyle,
};

pub const BRAND_TITLE: &str = "AyurNutriCare";
pub const BRAND_SUBTITLE: &str = "Personalized Ayurvedic Diet Chart";
pub const BRAND_FOOTER: &str = "AyurNutriCare - Holistic Wellness Platform";

/// Indent of meal detail lines from the left margin.
const MEAL_DETAIL_INDENT_MM: f32 = 5.0;
/// Indent of meal foods, preparation and benefits text.
const MEAL_BODY_INDENT_MM: f32 = 10.0;

// ────────────────────────────────────────────────────────────────────────────
// Record
// ────────────────────────────────────────────────────────────────────────────

/// Meals in the order they are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealKind {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealKind {
    pub const ALL: [MealKind; 4] = [
        MealKind::Breakfast,
        MealKind::Lunch,
        MealKind::Dinner,
        MealKind::Snacks,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            MealKind::Breakfast => "Breakfast",
            MealKind::Lunch => "Lunch",
            MealKind::Dinner => "Dinner",
            MealKind::Snacks => "Snacks",
        }
    }

    pub fn default_timing(&self) -> &'static str {
        match self {
            MealKind::Breakfast => "7:00 - 8:00 AM",
            MealKind::Lunch => "12:00 - 1:00 PM",
            MealKind::Dinner => "7:00 - 8:00 PM",
            MealKind::Snacks => "4:00 - 5:00 PM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub foods: Vec<String>,
    pub timing: String,
    pub preparation: String,
    pub benefits: String,
}

impl MealRecord {
    fn new(kind: MealKind) -> Self {
        Self {
            foods: vec![String::new()],
            timing: kind.default_timing().to_string(),
            preparation: String::new(),
            benefits: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanDuration {
    #[serde(rename = "2 weeks")]
    TwoWeeks,
    #[serde(rename = "4 weeks")]
    FourWeeks,
    #[serde(rename = "6 weeks")]
    SixWeeks,
    #[serde(rename = "8 weeks")]
    EightWeeks,
    #[serde(rename = "12 weeks")]
    TwelveWeeks,
}

impl PlanDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanDuration::TwoWeeks => "2 weeks",
            PlanDuration::FourWeeks => "4 weeks",
            PlanDuration::SixWeeks => "6 weeks",
            PlanDuration::EightWeeks => "8 weeks",
            PlanDuration::TwelveWeeks => "12 weeks",
        }
    }
}

impl FromStr for PlanDuration {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2 weeks" => Ok(PlanDuration::TwoWeeks),
            "4 weeks" => Ok(PlanDuration::FourWeeks),
            "6 weeks" => Ok(PlanDuration::SixWeeks),
            "8 weeks" => Ok(PlanDuration::EightWeeks),
            "12 weeks" => Ok(PlanDuration::TwelveWeeks),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUp {
    #[serde(rename = "1 week")]
    OneWeek,
    #[serde(rename = "2 weeks")]
    TwoWeeks,
    #[serde(rename = "4 weeks")]
    FourWeeks,
}

impl FollowUp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUp::OneWeek => "1 week",
            FollowUp::TwoWeeks => "2 weeks",
            FollowUp::FourWeeks => "4 weeks",
        }
    }
}

impl FromStr for FollowUp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1 week" => Ok(FollowUp::OneWeek),
            "2 weeks" => Ok(FollowUp::TwoWeeks),
            "4 weeks" => Ok(FollowUp::FourWeeks),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietChart {
    pub constitution: String,
    pub health_goals: String,
    pub restrictions: String,
    pub meals: BTreeMap<MealKind, MealRecord>,
    pub guidelines: Vec<String>,
    pub herbs: Vec<String>,
    pub lifestyle: Vec<String>,
    pub duration: PlanDuration,
    pub follow_up: FollowUp,
}

impl DietChart {
    /// A fresh chart seeded from the patient's constitution and restrictions.
    pub fn for_patient(constitution: &str, restrictions: &str) -> Self {
        Self {
            constitution: constitution.to_string(),
            health_goals: String::new(),
            restrictions: restrictions.to_string(),
            meals: MealKind::ALL
                .iter()
                .map(|kind| (*kind, MealRecord::new(*kind)))
                .collect(),
            guidelines: vec![String::new()],
            herbs: vec![String::new()],
            lifestyle: vec![String::new()],
            duration: PlanDuration::FourWeeks,
            follow_up: FollowUp::TwoWeeks,
        }
    }

    #[cfg(test)]
    pub fn meal(&self, kind: MealKind) -> Option<&MealRecord> {
        self.meals.get(&kind)
    }

    fn list(&self, list: ListField) -> &Vec<String> {
        match list {
            ListField::Guidelines => &self.guidelines,
            ListField::Herbs => &self.herbs,
            ListField::Lifestyle => &self.lifestyle,
        }
    }

    fn list_mut(&mut self, list: ListField) -> &mut Vec<String> {
        match list {
            ListField::Guidelines => &mut self.guidelines,
            ListField::Herbs => &mut self.herbs,
            ListField::Lifestyle => &mut self.lifestyle,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Edits
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartField {
    Constitution,
    HealthGoals,
    Restrictions,
    Duration,
    FollowUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealField {
    Timing,
    Preparation,
    Benefits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListField {
    Guidelines,
    Herbs,
    Lifestyle,
}

impl fmt::Display for ListField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ListField::Guidelines => "guidelines",
            ListField::Herbs => "herbs",
            ListField::Lifestyle => "lifestyle",
        })
    }
}

/// One change to a chart, as sent by the editing form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DietEdit {
    SetField { field: ChartField, value: String },
    SetMealField { meal: MealKind, field: MealField, value: String },
    AddFood { meal: MealKind },
    UpdateFood { meal: MealKind, index: usize, value: String },
    RemoveFood { meal: MealKind, index: usize },
    AddItem { list: ListField },
    UpdateItem { list: ListField, index: usize, value: String },
    RemoveItem { list: ListField, index: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("{target} has no item at index {index} (length {len})")]
    IndexOutOfRange {
        target: String,
        index: usize,
        len: usize,
    },

    #[error("{0} must keep at least one item")]
    LastItem(String),

    #[error("'{value}' is not a valid {field}")]
    InvalidChoice { field: &'static str, value: String },
}

fn check_index(target: impl fmt::Display, items: &[String], index: usize) -> Result<(), EditError> {
    if index < items.len() {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange {
            target: target.to_string(),
            index,
            len: items.len(),
        })
    }
}

fn remove_item(target: impl fmt::Display, items: &mut Vec<String>, index: usize) -> Result<(), EditError> {
    check_index(&target, items, index)?;
    if items.len() == 1 {
        return Err(EditError::LastItem(target.to_string()));
    }
    items.remove(index);
    Ok(())
}

impl DietChart {
    /// Returns a new chart with `edit` applied.
    pub fn apply(&self, edit: &DietEdit) -> Result<DietChart, EditError> {
        let mut next = self.clone();

        match edit {
            DietEdit::SetField { field, value } => match field {
                ChartField::Constitution => next.constitution = value.clone(),
                ChartField::HealthGoals => next.health_goals = value.clone(),
                ChartField::Restrictions => next.restrictions = value.clone(),
                ChartField::Duration => {
                    next.duration = value.parse().map_err(|_| EditError::InvalidChoice {
                        field: "duration",
                        value: value.clone(),
                    })?;
                }
                ChartField::FollowUp => {
                    next.follow_up = value.parse().map_err(|_| EditError::InvalidChoice {
                        field: "follow-up",
                        value: value.clone(),
                    })?;
                }
            },
            DietEdit::SetMealField { meal, field, value } => {
                let record = next.meal_mut(*meal);
                match field {
                    MealField::Timing => record.timing = value.clone(),
                    MealField::Preparation => record.preparation = value.clone(),
                    MealField::Benefits => record.benefits = value.clone(),
                }
            }
            DietEdit::AddFood { meal } => next.meal_mut(*meal).foods.push(String::new()),
            DietEdit::UpdateFood { meal, index, value } => {
                let foods = &mut next.meal_mut(*meal).foods;
                check_index(food_target(*meal), foods, *index)?;
                foods[*index] = value.clone();
            }
            DietEdit::RemoveFood { meal, index } => {
                remove_item(food_target(*meal), &mut next.meal_mut(*meal).foods, *index)?;
            }
            DietEdit::AddItem { list } => next.list_mut(*list).push(String::new()),
            DietEdit::UpdateItem { list, index, value } => {
                check_index(list, next.list(*list), *index)?;
                next.list_mut(*list)[*index] = value.clone();
            }
            DietEdit::RemoveItem { list, index } => {
                remove_item(list, next.list_mut(*list), *index)?;
            }
        }
        Ok(next)
    }

    /// Applies `edits` in order. Either all of them apply or none do.
    pub fn apply_all(&self, edits: &[DietEdit]) -> Result<DietChart, EditError> {
        edits
            .iter()
            .try_fold(self.clone(), |chart, edit| chart.apply(edit))
    }

    fn meal_mut(&mut self, kind: MealKind) -> &mut MealRecord {
        self.meals
            .entry(kind)
            .or_insert_with(|| MealRecord::new(kind))
    }
}

fn food_target(meal: MealKind) -> String {
    format!("{} foods", meal.title().to_lowercase())
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Who the chart is for and who prepared it.
#[derive(Debug, Clone)]
pub struct ChartHeader {
    pub patient_name: String,
    pub patient_age: u32,
    pub prepared_by: String,
    pub date: NaiveDate,
}

fn non_blank(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lays the chart out without encoding it.
pub fn compose_diet_chart(
    config: PageConfig,
    header: &ChartHeader,
    chart: &DietChart,
) -> Result<Composer, ComposeError> {
    let mut composer = Composer::begin_document(config, format!("{} Diet Chart", header.patient_name));
    let body_size = composer.config().body_font_size_pt;
    let content_width = composer.config().content_width_mm();

    composer.write_heading(BRAND_TITLE, TextStyle::title())?;
    composer.write_heading(BRAND_SUBTITLE, TextStyle::subtitle())?;
    composer.advance(8.0);

    composer.write_heading("Patient Information", TextStyle::section())?;
    composer.advance(2.0);
    let intro = [
        DocumentSection::untitled(SectionBody::KeyValuePairs(vec![
            ("Name".into(), header.patient_name.clone()),
            ("Age".into(), header.patient_age.to_string()),
            ("Constitution".into(), chart.constitution.clone()),
            ("Date".into(), header.date.format("%d/%m/%Y").to_string()),
        ])),
        DocumentSection::new("Health Goals", SectionBody::Paragraph(chart.health_goals.clone())),
        DocumentSection::new(
            "Dietary Restrictions",
            SectionBody::Paragraph(chart.restrictions.clone()),
        ),
    ];
    render_sections(&mut composer, &intro)?;

    composer.write_heading("Daily Meal Plan", TextStyle::section())?;
    composer.advance(4.0);

    let detail_width = content_width - MEAL_DETAIL_INDENT_MM;
    let body_width = content_width - MEAL_BODY_INDENT_MM;
    let body = TextStyle::body(body_size);
    let label = TextStyle::label(body_size);

    for (kind, meal) in &chart.meals {
        composer.write_heading(kind.title(), TextStyle::subsection())?;
        composer.write_paragraph_styled(
            &format!("Timing: {}", meal.timing),
            MEAL_DETAIL_INDENT_MM,
            detail_width,
            body,
        )?;

        let foods = non_blank(&meal.foods);
        if !foods.is_empty() {
            composer.write_heading_at("Foods:", MEAL_DETAIL_INDENT_MM, label)?;
            composer.write_bulleted_list(&foods, MEAL_BODY_INDENT_MM)?;
        }
        for (title, text) in [("Preparation:", &meal.preparation), ("Benefits:", &meal.benefits)] {
            if text.trim().is_empty() {
                continue;
            }
            composer.write_heading_at(title, MEAL_DETAIL_INDENT_MM, label)?;
            composer.write_paragraph_styled(text, MEAL_BODY_INDENT_MM, body_width, body)?;
        }
        composer.advance(6.0);
    }

    let lists = [
        DocumentSection::new("Dietary Guidelines", SectionBody::BulletedList(chart.guidelines.clone())),
        DocumentSection::new("Recommended Herbs", SectionBody::BulletedList(chart.herbs.clone())),
        DocumentSection::new(
            "Lifestyle Recommendations",
            SectionBody::BulletedList(chart.lifestyle.clone()),
        ),
    ];
    render_sections(&mut composer, &lists)?;

    let plan = TextStyle::body(12.0);
    composer.write_paragraph_styled(
        &format!("Duration: {}", chart.duration.as_str()),
        0.0,
        content_width,
        plan,
    )?;
    composer.write_paragraph_styled(
        &format!("Follow-up: {}", chart.follow_up.as_str()),
        0.0,
        content_width,
        plan,
    )?;

    composer.advance(10.0);
    composer.write_heading(&format!("Prepared by: {}", header.prepared_by), TextStyle::footer())?;
    composer.write_heading(BRAND_FOOTER, TextStyle::footer())?;

    Ok(composer)
}

/// Produces `<Patient_Name>_Diet_Chart.pdf`.
pub fn build_diet_chart(
    config: PageConfig,
    header: &ChartHeader,
    chart: &DietChart,
) -> Result<DownloadableArtifact, ComposeError> {
    let composer = compose_diet_chart(config, header, chart)?;
    composer.finalize_document(&format!("{}_Diet_Chart.pdf", header.patient_name))
}
