//! Daily health tips, profile-based suggestions and the quick disease
//! reference.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

pub const HEALTH_TIPS: &[&str] = &[
    "Regular handwashing with soap for 20 seconds can prevent up to 80% of infectious diseases.",
    "Drinking 8-10 glasses of clean water daily helps maintain proper hydration and kidney function.",
    "30 minutes of physical activity 5 times a week can reduce the risk of chronic diseases by 50%.",
    "Eating a variety of colorful fruits and vegetables provides essential vitamins and antioxidants.",
    "Getting 7-9 hours of quality sleep is crucial for immune system function and mental health.",
    "Regular health checkups can detect problems early when they're most treatable.",
    "Avoiding tobacco and limiting alcohol consumption significantly reduces cancer and heart disease risk.",
    "Stress management through meditation or deep breathing can lower blood pressure and improve wellbeing.",
    "Proper food storage and preparation prevents foodborne illnesses and contamination.",
    "Vaccination according to schedule protects against preventable diseases for you and your community.",
    "Using mosquito nets and repellents reduces malaria transmission by up to 90%.",
    "Breastfeeding for the first 6 months provides optimal nutrition and immunity for infants.",
];

pub fn random_tip<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    HEALTH_TIPS.choose(rng).copied().unwrap_or(HEALTH_TIPS[0])
}

/// Extra tips for a user's age and gender.
pub fn personalized_tips(age: u8, gender: Option<&str>) -> Vec<&'static str> {
    let mut tips = Vec::new();
    if age < 18 {
        tips.push("Ensure regular vaccinations according to the childhood immunization schedule");
        tips.push("Encourage physical activity and limit screen time for healthy development");
    } else if age > 65 {
        tips.push("Consider annual health screenings for early detection of age-related conditions");
        tips.push("Maintain social connections to support mental health and cognitive function");
    }
    if gender == Some("female") {
        tips.push("Schedule regular cervical cancer screenings and breast self-examinations");
        tips.push("Ensure adequate folic acid intake, especially during reproductive years");
    }
    tips
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiseaseInfo {
    pub name: &'static str,
    pub symptoms: &'static [&'static str],
    pub prevention: &'static [&'static str],
    pub treatment: &'static str,
}

pub const MSG_DISEASE_NOT_FOUND: &str =
    "Disease information not found. Please contact a healthcare provider for more information.";

const DISEASES: &[DiseaseInfo] = &[
    DiseaseInfo {
        name: "malaria",
        symptoms: &["High fever", "Chills", "Headache", "Muscle aches", "Fatigue"],
        prevention: &[
            "Use mosquito nets",
            "Apply repellent",
            "Remove standing water",
            "Take antimalarial medication if prescribed",
        ],
        treatment: "Seek immediate medical attention for proper diagnosis and antimalarial medication",
    },
    DiseaseInfo {
        name: "diabetes",
        symptoms: &[
            "Excessive thirst",
            "Frequent urination",
            "Unexplained weight loss",
            "Fatigue",
            "Blurred vision",
        ],
        prevention: &[
            "Maintain healthy weight",
            "Exercise regularly",
            "Eat balanced diet",
            "Limit sugar intake",
        ],
        treatment: "Requires ongoing medical management with medication, diet, and lifestyle changes",
    },
    DiseaseInfo {
        name: "hypertension",
        symptoms: &[
            "Often no symptoms",
            "Headaches",
            "Shortness of breath",
            "Nosebleeds",
            "Chest pain",
        ],
        prevention: &[
            "Reduce sodium intake",
            "Exercise regularly",
            "Maintain healthy weight",
            "Limit alcohol",
            "Manage stress",
        ],
        treatment: "Lifestyle changes and medication as prescribed by healthcare provider",
    },
];

/// Case-insensitive lookup in the quick reference.
pub fn lookup_disease(name: &str) -> Option<&'static DiseaseInfo> {
    let needle = name.trim().to_lowercase();
    DISEASES.iter().find(|d| d.name == needle)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn twelve_tips() {
        assert_eq!(HEALTH_TIPS.len(), 12);
    }

    #[test]
    fn random_tip_comes_from_list() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            assert!(HEALTH_TIPS.contains(&random_tip(&mut rng)));
        }
    }

    #[test]
    fn personalized_by_age_and_gender() {
        assert_eq!(personalized_tips(30, Some("male")).len(), 0);
        assert_eq!(personalized_tips(12, None).len(), 2);
        assert_eq!(personalized_tips(70, Some("female")).len(), 4);
    }

    #[test]
    fn disease_lookup_ignores_case() {
        assert_eq!(lookup_disease("Malaria").unwrap().symptoms.len(), 5);
        assert!(lookup_disease(" HYPERTENSION ").is_some());
        assert!(lookup_disease("cholera").is_none());
    }
}
