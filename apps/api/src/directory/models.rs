use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatientStatus {
    Active,
    FollowUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    /// Derived from `date_of_birth`; recomputed on every update.
    pub age: u32,
    pub gender: String,
    pub last_visit: NaiveDate,
    pub constitution: String,
    pub status: PatientStatus,
    /// Kilograms.
    pub weight: f32,
    /// Centimetres.
    pub height: f32,
    pub blood_group: String,
    pub allergies: String,
    pub medical_history: String,
    pub dietary_restrictions: String,
    pub contact_number: String,
    pub address: String,
    pub emergency_contact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    Pending,
    InReview,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub title: String,
    pub description: String,
    pub health_goals: String,
    pub current_symptoms: String,
    pub status: RequestStatus,
    pub created_at: NaiveDate,
    pub assigned_doctor_id: Option<String>,
    pub response: Option<String>,
}

/// Body of a patient's new consultation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub health_goals: String,
    pub current_symptoms: String,
}

/// Whole years between `dob` and `today`.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn seed_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "1".into(),
            name: "Priya Sharma".into(),
            date_of_birth: date(1992, 3, 15),
            age: 32,
            gender: "female".into(),
            last_visit: date(2024, 1, 15),
            constitution: "Vata-Pitta".into(),
            status: PatientStatus::Active,
            weight: 65.0,
            height: 165.0,
            blood_group: "O+".into(),
            allergies: "Nuts, Dairy".into(),
            medical_history: "Hypothyroidism, Anxiety".into(),
            dietary_restrictions: "Vegetarian".into(),
            contact_number: "+91 9876543210".into(),
            address: "123 Green Street, Mumbai, Maharashtra".into(),
            emergency_contact: "Raj Sharma - +91 9876543211".into(),
        },
        Patient {
            id: "2".into(),
            name: "Arjun Patel".into(),
            date_of_birth: date(1996, 7, 22),
            age: 28,
            gender: "male".into(),
            last_visit: date(2024, 1, 12),
            constitution: "Pitta-Kapha".into(),
            status: PatientStatus::Active,
            weight: 78.0,
            height: 175.0,
            blood_group: "A+".into(),
            allergies: "Shellfish".into(),
            medical_history: "Hypertension".into(),
            dietary_restrictions: "Low sodium".into(),
            contact_number: "+91 9876543212".into(),
            address: "456 Blue Avenue, Delhi, Delhi".into(),
            emergency_contact: "Meera Patel - +91 9876543213".into(),
        },
        Patient {
            id: "3".into(),
            name: "Meera Singh".into(),
            date_of_birth: date(1979, 11, 8),
            age: 45,
            gender: "female".into(),
            last_visit: date(2024, 1, 10),
            constitution: "Kapha-Vata".into(),
            status: PatientStatus::FollowUp,
            weight: 70.0,
            height: 160.0,
            blood_group: "B+".into(),
            allergies: "Gluten".into(),
            medical_history: "Diabetes Type 2, Arthritis".into(),
            dietary_restrictions: "Gluten-free, Low sugar".into(),
            contact_number: "+91 9876543214".into(),
            address: "789 Red Road, Bangalore, Karnataka".into(),
            emergency_contact: "Vikram Singh - +91 9876543215".into(),
        },
        Patient {
            id: "4".into(),
            name: "Mukesh".into(),
            date_of_birth: date(1990, 5, 4),
            age: 34,
            gender: "male".into(),
            last_visit: date(2024, 1, 8),
            constitution: "Pitta".into(),
            status: PatientStatus::Active,
            weight: 72.0,
            height: 172.0,
            blood_group: "AB+".into(),
            allergies: "None".into(),
            medical_history: "Acidity".into(),
            dietary_restrictions: "".into(),
            contact_number: "+91 9876543216".into(),
            address: "22 Lotus Lane, Pune, Maharashtra".into(),
            emergency_contact: "Anita Kumar - +91 9876543217".into(),
        },
    ]
}

pub fn seed_requests() -> Vec<ConsultationRequest> {
    vec![
        ConsultationRequest {
            id: "1".into(),
            patient_id: "1".into(),
            patient_name: "Priya Sharma".into(),
            title: "Weight Management Plan".into(),
            description: "Looking for a personalized Ayurvedic diet plan to help with healthy \
                          weight management and increased energy levels."
                .into(),
            health_goals: "Lose 5kg in 3 months, increase energy, improve digestion".into(),
            current_symptoms: "Low energy, irregular digestion, cravings for sweets".into(),
            status: RequestStatus::Completed,
            created_at: date(2024, 1, 10),
            assigned_doctor_id: Some("doc-1".into()),
            response: Some(
                "Based on your Vata-Pitta constitution, I recommend warm, cooked foods with mild spices."
                    .into(),
            ),
        },
        ConsultationRequest {
            id: "2".into(),
            patient_id: "2".into(),
            patient_name: "Arjun Patel".into(),
            title: "Digestive Health Consultation".into(),
            description: "Experiencing digestive issues and would like an Ayurvedic approach \
                          to improve gut health."
                .into(),
            health_goals: "Better digestion, reduced bloating, regular bowel movements".into(),
            current_symptoms: "Bloating after meals, irregular bowel movements, acid reflux".into(),
            status: RequestStatus::Pending,
            created_at: date(2024, 1, 15),
            assigned_doctor_id: None,
            response: None,
        },
        ConsultationRequest {
            id: "3".into(),
            patient_id: "3".into(),
            patient_name: "Meera Singh".into(),
            title: "Energy and Vitality Enhancement".into(),
            description: "Feeling constantly tired and looking for natural ways to boost \
                          energy through nutrition."
                .into(),
            health_goals: "Increase energy levels, better sleep quality, mental clarity".into(),
            current_symptoms: "Chronic fatigue, poor sleep, mental fog".into(),
            status: RequestStatus::InReview,
            created_at: date(2024, 1, 14),
            assigned_doctor_id: None,
            response: None,
        },
    ]
}
