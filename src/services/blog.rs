//! Health blog: article feed with category and text filters, load-more
//! paging, the rotating tips carousel and newsletter signup.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::notify::Notice;
use crate::validation;

pub const ARTICLES_PER_PAGE: usize = 9;
pub const ALL_CATEGORIES: &str = "all";
pub const TIP_ROTATE_INTERVAL: Duration = Duration::from_secs(5);

pub const MSG_NO_ARTICLES: &str = "No articles found";
pub const MSG_SUBSCRIBED: &str = "Successfully subscribed! You will receive weekly health updates.";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NewsletterError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please accept the terms to subscribe.")]
    TermsNotAccepted,
}

impl NewsletterError {
    pub fn notice(&self) -> Notice {
        Notice::error(self.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: u32,
    pub title: &'static str,
    pub excerpt: &'static str,
    pub category: &'static str,
    pub read_time: &'static str,
    /// YYYY-MM-DD
    pub date: &'static str,
    pub tags: &'static [&'static str],
    pub icon: &'static str,
}

impl Article {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.excerpt.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

pub const ARTICLES: &[Article] = &[
    Article {
        id: 1,
        title: "Understanding Malaria: Prevention and Treatment in East Africa",
        excerpt: "Comprehensive guide to malaria prevention including bed nets, medication, and environmental control measures.",
        category: "prevention",
        read_time: "8 min",
        date: "2024-12-15",
        tags: &["Malaria", "Prevention", "East Africa"],
        icon: "fas fa-shield-virus",
    },
    Article {
        id: 2,
        title: "Maternal Health: Essential Prenatal Care Guidelines",
        excerpt: "Important prenatal care practices for expectant mothers in rural communities with limited healthcare access.",
        category: "maternal",
        read_time: "6 min",
        date: "2024-12-12",
        tags: &["Pregnancy", "Maternal Health", "Prenatal Care"],
        icon: "fas fa-baby",
    },
    Article {
        id: 3,
        title: "Managing Diabetes in Resource-Limited Settings",
        excerpt: "Practical strategies for diabetes management when healthcare resources are scarce.",
        category: "prevention",
        read_time: "10 min",
        date: "2024-12-10",
        tags: &["Diabetes", "Chronic Disease", "Management"],
        icon: "fas fa-heartbeat",
    },
    Article {
        id: 4,
        title: "Child Vaccination Schedule: Complete Guide for Parents",
        excerpt: "Essential vaccination timeline and importance of immunization for children in East Africa.",
        category: "child",
        read_time: "7 min",
        date: "2024-12-08",
        tags: &["Vaccination", "Child Health", "Immunization"],
        icon: "fas fa-syringe",
    },
    Article {
        id: 5,
        title: "Nutrition During Pregnancy: Foods for Healthy Development",
        excerpt: "Nutritional requirements and food recommendations for pregnant women in African communities.",
        category: "nutrition",
        read_time: "9 min",
        date: "2024-12-05",
        tags: &["Nutrition", "Pregnancy", "Diet"],
        icon: "fas fa-apple-alt",
    },
    Article {
        id: 6,
        title: "Mental Health Awareness: Breaking the Stigma",
        excerpt: "Understanding mental health challenges and promoting community support systems.",
        category: "mental",
        read_time: "11 min",
        date: "2024-12-03",
        tags: &["Mental Health", "Community", "Stigma"],
        icon: "fas fa-brain",
    },
    Article {
        id: 7,
        title: "First Aid Essentials: Emergency Response in Rural Areas",
        excerpt: "Basic first aid techniques and emergency response when professional help is not immediately available.",
        category: "emergency",
        read_time: "8 min",
        date: "2024-12-01",
        tags: &["First Aid", "Emergency", "Rural Health"],
        icon: "fas fa-first-aid",
    },
    Article {
        id: 8,
        title: "Tuberculosis: Recognition, Treatment, and Prevention",
        excerpt: "Complete guide to TB symptoms, treatment protocols, and prevention strategies.",
        category: "prevention",
        read_time: "12 min",
        date: "2024-11-28",
        tags: &["Tuberculosis", "TB", "Prevention"],
        icon: "fas fa-lungs",
    },
    Article {
        id: 9,
        title: "Water Sanitation and Hygiene (WASH) Practices",
        excerpt: "Importance of clean water, proper sanitation, and hygiene practices for disease prevention.",
        category: "prevention",
        read_time: "6 min",
        date: "2024-11-25",
        tags: &["WASH", "Sanitation", "Hygiene"],
        icon: "fas fa-hand-sparkles",
    },
    Article {
        id: 10,
        title: "Breastfeeding: Benefits and Best Practices",
        excerpt: "Comprehensive guide to breastfeeding benefits, techniques, and overcoming common challenges.",
        category: "maternal",
        read_time: "8 min",
        date: "2024-11-22",
        tags: &["Breastfeeding", "Maternal Health", "Infant Nutrition"],
        icon: "fas fa-baby",
    },
    Article {
        id: 11,
        title: "Childhood Diarrhea: Prevention and Home Management",
        excerpt: "Understanding causes of childhood diarrhea and effective home treatment methods.",
        category: "child",
        read_time: "7 min",
        date: "2024-11-20",
        tags: &["Diarrhea", "Child Health", "Home Treatment"],
        icon: "fas fa-child",
    },
    Article {
        id: 12,
        title: "HIV/AIDS Prevention and Support",
        excerpt: "Comprehensive information about HIV prevention, testing, and community support systems.",
        category: "prevention",
        read_time: "15 min",
        date: "2024-11-18",
        tags: &["HIV", "AIDS", "Prevention"],
        icon: "fas fa-ribbon",
    },
    Article {
        id: 13,
        title: "Traditional Medicine and Modern Healthcare Integration",
        excerpt: "Exploring the role of traditional medicine alongside modern healthcare practices in East Africa.",
        category: "prevention",
        read_time: "10 min",
        date: "2024-11-15",
        tags: &["Traditional Medicine", "Healthcare", "Integration"],
        icon: "fas fa-leaf",
    },
    Article {
        id: 14,
        title: "Managing High Blood Pressure Without Medication",
        excerpt: "Lifestyle modifications and natural approaches to controlling hypertension.",
        category: "prevention",
        read_time: "9 min",
        date: "2024-11-12",
        tags: &["Hypertension", "Blood Pressure", "Lifestyle"],
        icon: "fas fa-heart",
    },
    Article {
        id: 15,
        title: "Community Health Worker Training Guidelines",
        excerpt: "Essential training modules and best practices for community health workers in rural settings.",
        category: "emergency",
        read_time: "13 min",
        date: "2024-11-10",
        tags: &["CHW", "Training", "Community Health"],
        icon: "fas fa-user-md",
    },
];

/// Badge label for a category id; unknown ids read "Health".
pub fn category_name(category: &str) -> &'static str {
    match category {
        "prevention" => "Disease Prevention",
        "maternal" => "Maternal Health",
        "child" => "Child Health",
        "nutrition" => "Nutrition",
        "mental" => "Mental Health",
        "emergency" => "Emergency Care",
        _ => "Health",
    }
}

/// `2024-12-15` → `December 15, 2024`. Unparsable dates pass through.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

// ═══════════════════════════════════════════
// Article feed
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleCard {
    pub id: u32,
    pub title: String,
    pub excerpt: String,
    pub category_label: String,
    pub date_label: String,
    pub read_time_label: String,
    pub tags: Vec<String>,
    pub icon: String,
}

impl From<&Article> for ArticleCard {
    fn from(a: &Article) -> Self {
        Self {
            id: a.id,
            title: a.title.to_string(),
            excerpt: a.excerpt.to_string(),
            category_label: category_name(a.category).to_string(),
            date_label: format_date(a.date),
            read_time_label: format!("{} read", a.read_time),
            tags: a.tags.iter().map(|t| t.to_string()).collect(),
            icon: a.icon.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedPage {
    pub articles: Vec<ArticleCard>,
    /// Load-more button visible.
    pub has_more: bool,
    /// Set when nothing matches.
    pub empty_message: Option<&'static str>,
}

/// Feed state: category, lower-cased query and pages loaded so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogFeed {
    category: String,
    query: String,
    page: usize,
}

impl Default for BlogFeed {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            query: String::new(),
            page: 1,
        }
    }
}

impl BlogFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn filtered(&self) -> Vec<&'static Article> {
        ARTICLES
            .iter()
            .filter(|a| self.category == ALL_CATEGORIES || a.category == self.category)
            .filter(|a| self.query.is_empty() || a.matches(&self.query))
            .collect()
    }

    /// Every article up to the current page.
    pub fn render(&self) -> FeedPage {
        let filtered = self.filtered();
        let end = self.page * ARTICLES_PER_PAGE;
        let articles: Vec<ArticleCard> = filtered.iter().take(end).map(|a| ArticleCard::from(*a)).collect();
        if articles.is_empty() {
            return FeedPage {
                articles,
                has_more: false,
                empty_message: Some(MSG_NO_ARTICLES),
            };
        }
        FeedPage {
            articles,
            has_more: end < filtered.len(),
            empty_message: None,
        }
    }

    /// Category change restarts paging.
    pub fn filter_by_category(&mut self, category: &str) -> FeedPage {
        self.category = category.to_string();
        self.page = 1;
        self.render()
    }

    pub fn search(&mut self, query: &str) -> FeedPage {
        self.query = query.to_lowercase();
        self.page = 1;
        tracing::debug!(query = %self.query, "Blog search");
        self.render()
    }

    pub fn load_more(&mut self) -> FeedPage {
        self.page += 1;
        self.render()
    }

    pub fn reset(&mut self) -> FeedPage {
        *self = Self::default();
        self.render()
    }
}

// ═══════════════════════════════════════════
// Tips carousel
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlogTip {
    pub icon: &'static str,
    pub title: &'static str,
    pub content: &'static str,
}

pub const BLOG_TIPS: &[BlogTip] = &[
    BlogTip {
        icon: "fas fa-hand-sparkles",
        title: "Hand Hygiene",
        content: "Wash your hands with soap for at least 20 seconds, especially before eating, after using the bathroom, and after coughing or sneezing. This simple practice prevents many infectious diseases.",
    },
    BlogTip {
        icon: "fas fa-tint",
        title: "Stay Hydrated",
        content: "Drink at least 8 glasses of clean, safe water daily. Proper hydration helps your body fight infections, regulates temperature, and maintains healthy organ function.",
    },
    BlogTip {
        icon: "fas fa-bed",
        title: "Quality Sleep",
        content: "Get 7-9 hours of quality sleep each night. Use mosquito nets to prevent malaria while sleeping. Good sleep strengthens your immune system and improves mental health.",
    },
    BlogTip {
        icon: "fas fa-apple-alt",
        title: "Balanced Nutrition",
        content: "Eat a variety of local fruits, vegetables, whole grains, and proteins. Include foods rich in vitamins A, C, and iron. Proper nutrition boosts immunity and energy levels.",
    },
    BlogTip {
        icon: "fas fa-running",
        title: "Physical Activity",
        content: "Engage in at least 30 minutes of physical activity daily. Walking, farming, dancing, or playing sports helps maintain cardiovascular health and mental wellbeing.",
    },
    BlogTip {
        icon: "fas fa-shield-alt",
        title: "Vaccination",
        content: "Keep up-to-date with recommended vaccinations for you and your family. Vaccines prevent serious diseases and protect community health through herd immunity.",
    },
    BlogTip {
        icon: "fas fa-home",
        title: "Clean Environment",
        content: "Keep your living space clean and well-ventilated. Remove standing water to prevent mosquito breeding. A clean environment reduces disease transmission.",
    },
    BlogTip {
        icon: "fas fa-stethoscope",
        title: "Regular Check-ups",
        content: "Visit healthcare providers regularly for preventive screenings and check-ups. Early detection and prevention are key to maintaining good health.",
    },
];

/// Active tip index; wraps in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TipCarousel {
    index: usize,
}

impl TipCarousel {
    pub fn current(&self) -> &'static BlogTip {
        &BLOG_TIPS[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) -> &'static BlogTip {
        self.index = (self.index + 1) % BLOG_TIPS.len();
        self.current()
    }

    pub fn prev(&mut self) -> &'static BlogTip {
        self.index = (self.index + BLOG_TIPS.len() - 1) % BLOG_TIPS.len();
        self.current()
    }

    /// Jump from an indicator click. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> &'static BlogTip {
        if index < BLOG_TIPS.len() {
            self.index = index;
        }
        self.current()
    }
}

/// Rotate `carousel` every `interval` until the task is aborted.
pub fn spawn_tip_rotation(
    carousel: std::sync::Arc<std::sync::Mutex<TipCarousel>>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match carousel.lock() {
                Ok(mut c) => {
                    c.next();
                }
                Err(_) => break,
            }
        }
    })
}

// ═══════════════════════════════════════════
// Newsletter
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterForm {
    pub email: String,
    pub terms_accepted: bool,
}

impl NewsletterForm {
    pub fn validate(&self) -> Result<(), NewsletterError> {
        if !validation::is_valid_email(self.email.trim()) {
            return Err(NewsletterError::InvalidEmail);
        }
        if !self.terms_accepted {
            return Err(NewsletterError::TermsNotAccepted);
        }
        Ok(())
    }
}

/// Validate, wait out the simulated signup and return the success toast.
/// The caller resets the form on success.
pub async fn subscribe(form: &NewsletterForm, delay: Duration) -> Result<Notice, NewsletterError> {
    form.validate()?;
    tokio::time::sleep(delay).await;
    tracing::info!("Newsletter subscription accepted");
    Ok(Notice::success(MSG_SUBSCRIBED))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::services::NoticeKind;

    fn ids(page: &FeedPage) -> Vec<u32> {
        page.articles.iter().map(|a| a.id).collect()
    }

    #[test]
    fn first_page_then_load_more() {
        let mut feed = BlogFeed::new();
        let first = feed.render();
        assert_eq!(ids(&first), (1..=9).collect::<Vec<_>>());
        assert!(first.has_more);

        let second = feed.load_more();
        assert_eq!(second.articles.len(), ARTICLES.len());
        assert!(!second.has_more);
    }

    #[test]
    fn category_filter_resets_paging() {
        let mut feed = BlogFeed::new();
        feed.load_more();
        let page = feed.filter_by_category("prevention");
        assert_eq!(ids(&page), vec![1, 3, 8, 9, 12, 13, 14]);
        assert!(!page.has_more);
        assert_eq!(page.articles[0].category_label, "Disease Prevention");
        assert_eq!(feed.category(), "prevention");
    }

    #[test]
    fn search_checks_title_excerpt_and_tags() {
        let mut feed = BlogFeed::new();
        assert_eq!(ids(&feed.search("MALARIA")), vec![1]);
        assert_eq!(ids(&feed.search("stigma")), vec![6]);
        // Tag-only hit.
        assert_eq!(ids(&feed.search("chw")), vec![15]);
        assert_eq!(ids(&feed.search("pregnan")), vec![2, 5]);
    }

    #[test]
    fn search_and_category_combine() {
        let mut feed = BlogFeed::new();
        feed.filter_by_category("maternal");
        assert_eq!(ids(&feed.search("breastfeeding")), vec![10]);
        let none = feed.search("tuberculosis");
        assert!(none.articles.is_empty());
        assert_eq!(none.empty_message, Some(MSG_NO_ARTICLES));
        assert!(!none.has_more);

        let all = feed.reset();
        assert_eq!(all.articles.len(), ARTICLES_PER_PAGE);
        assert_eq!(feed, BlogFeed::new());
    }

    #[test]
    fn card_labels() {
        let card = ArticleCard::from(&ARTICLES[0]);
        assert_eq!(card.date_label, "December 15, 2024");
        assert_eq!(card.read_time_label, "8 min read");
        assert_eq!(category_name("dental"), "Health");
        assert_eq!(format_date("soon"), "soon");
        assert_eq!(format_date("2024-11-05"), "November 5, 2024");
    }

    #[test]
    fn carousel_wraps_both_ways() {
        let mut c = TipCarousel::default();
        assert_eq!(c.current().title, "Hand Hygiene");
        assert_eq!(c.prev().title, "Regular Check-ups");
        assert_eq!(c.next().title, "Hand Hygiene");
        assert_eq!(c.go_to(3).title, "Balanced Nutrition");
        assert_eq!(c.go_to(99).title, "Balanced Nutrition");
        assert_eq!(c.index(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn rotation_advances_each_interval() {
        let carousel = Arc::new(Mutex::new(TipCarousel::default()));
        let handle = spawn_tip_rotation(carousel.clone(), TIP_ROTATE_INTERVAL);

        tokio::time::sleep(TIP_ROTATE_INTERVAL * 2 + Duration::from_millis(10)).await;
        assert_eq!(carousel.lock().unwrap().index(), 2);
        handle.abort();
    }

    #[test]
    fn newsletter_validation_order() {
        let blank = NewsletterForm::default();
        assert_eq!(blank.validate(), Err(NewsletterError::InvalidEmail));

        let malformed = NewsletterForm { email: "amina@example".into(), terms_accepted: true };
        assert_eq!(malformed.validate(), Err(NewsletterError::InvalidEmail));

        let no_terms = NewsletterForm { email: "amina@example.co.ke".into(), terms_accepted: false };
        let err = no_terms.validate().unwrap_err();
        assert_eq!(err.notice().message, "Please accept the terms to subscribe.");
        assert_eq!(err.notice().kind, NoticeKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribe_waits_then_confirms() {
        let form = NewsletterForm { email: " amina@example.co.ke ".into(), terms_accepted: true };
        let started = tokio::time::Instant::now();
        let notice = subscribe(&form, Duration::from_millis(2000)).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(notice.message, MSG_SUBSCRIBED);
        assert_eq!(notice.kind, NoticeKind::Success);
    }
}
