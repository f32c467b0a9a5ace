//! Static description of the site owner served to the front-end

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{communication::email_addresses::EmailAddress, contact::SiteOwner};

/// Contact and identity details
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PersonalInfo {
    /// Full name
    #[schema(example = "Subash S")]
    pub name: String,

    /// Headline
    pub title: String,

    /// Secondary headline
    pub subtitle: String,

    /// Public contact email
    pub email: String,

    /// Public phone number
    pub phone: String,

    /// City and country
    pub location: String,

    /// Public portfolio URL
    pub website: String,

    /// GitHub profile URL
    pub github: String,

    /// LinkedIn profile URL
    pub linkedin: String,
}

/// Education summary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct About {
    /// Short biography
    pub summary: String,

    /// Grade point average
    pub cgpa: String,

    /// University name
    pub university: String,

    /// Years of study
    pub graduation_year: String,
}

/// Skills grouped by area
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Skills {
    /// Programming languages
    pub programming: Vec<String>,

    /// Front-end and web frameworks
    pub frontend: Vec<String>,

    /// Databases
    pub database: Vec<String>,

    /// Tooling
    pub tools: Vec<String>,

    /// Soft skills
    pub soft_skills: Vec<String>,
}

/// A spoken language and proficiency
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Language {
    /// Language name
    pub name: String,

    /// Proficiency level
    pub level: String,
}

/// Everything the front-end needs to describe the site owner
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Portfolio {
    /// Identity and contact details
    pub personal: PersonalInfo,

    /// Education summary
    pub about: About,

    /// Skills grouped by area
    pub skills: Skills,

    /// Spoken languages
    pub languages: Vec<Language>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

impl Portfolio {
    /// The site owner's profile
    pub fn profile() -> Self {
        Self {
            personal: PersonalInfo {
                name: "Subash S".to_string(),
                title: "B.Tech Computer Science Student".to_string(),
                subtitle: "Full Stack Developer using MERN Stack".to_string(),
                email: "your-email@gmail.com".to_string(),
                phone: "+91-9345081127".to_string(),
                location: "Chennai, India".to_string(),
                website: "https://subash-dev-portfolio.zeabur.app".to_string(),
                github: "https://github.com/Subash-S-66".to_string(),
                linkedin: "https://www.linkedin.com/in/subash-s-514aa9373".to_string(),
            },
            about: About {
                summary: "Computer Science Engineering student with practical experience in \
                          full-stack web development, focusing on the MERN stack (using MySQL \
                          instead of MongoDB). Currently doing an internship at Postulate Info \
                          Tech, contributing to real-world projects."
                    .to_string(),
                cgpa: "7.7/10".to_string(),
                university: "Dr.M.G.R. Educational and Research Institute, Chennai".to_string(),
                graduation_year: "2022-2026".to_string(),
            },
            skills: Skills {
                programming: strings(&["JavaScript", "Python"]),
                frontend: strings(&[
                    "React.js",
                    "Node.js",
                    "Express.js",
                    "HTML",
                    "CSS",
                    "Tailwind CSS",
                ]),
                database: strings(&["MySQL", "PostgreSQL", "MongoDB"]),
                tools: strings(&["Git", "GitHub"]),
                soft_skills: strings(&["Problem Solving", "Teamwork", "Communication"]),
            },
            languages: vec![
                Language {
                    name: "English".to_string(),
                    level: "Fluent".to_string(),
                },
                Language {
                    name: "Tamil".to_string(),
                    level: "Fluent".to_string(),
                },
                Language {
                    name: "Hindi".to_string(),
                    level: "Basics".to_string(),
                },
            ],
        }
    }

    /// The owner as presented in outgoing emails
    pub fn site_owner(&self, notification_address: EmailAddress) -> SiteOwner {
        SiteOwner {
            name: self.personal.name.clone(),
            role: "Full-Stack Developer \u{2022} MERN + AI".to_string(),
            affiliation: self.about.university.clone(),
            website: self.personal.website.clone(),
            github: self.personal.github.clone(),
            linkedin: self.personal.linkedin.clone(),
            notification_address,
        }
    }
}
