//! Compiled-in résumé content
//!
//! Everything here is literal display data. The assistant's system prompt is
//! kept alongside so the bot and the page never disagree about the facts.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Hero,
    Experience,
    Education,
    Projects,
    Photography,
    Press,
    Skills,
    Contact,
}

impl SectionId {
    pub fn all() -> &'static [SectionId] {
        &[
            SectionId::Hero,
            SectionId::Experience,
            SectionId::Education,
            SectionId::Projects,
            SectionId::Photography,
            SectionId::Press,
            SectionId::Skills,
            SectionId::Contact,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionId::Hero => "About",
            SectionId::Experience => "Experience",
            SectionId::Education => "Education",
            SectionId::Projects => "Portfolio",
            SectionId::Photography => "Photography",
            SectionId::Press => "Press",
            SectionId::Skills => "Skills",
            SectionId::Contact => "Contact",
        }
    }

    pub fn anchor(&self) -> &'static str {
        match self {
            SectionId::Hero => "hero",
            SectionId::Experience => "experience",
            SectionId::Education => "education",
            SectionId::Projects => "projects",
            SectionId::Photography => "photography",
            SectionId::Press => "press",
            SectionId::Skills => "skills",
            SectionId::Contact => "contact",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub name: &'static str,
    pub monogram: &'static str,
    pub kicker: &'static str,
    pub headline: &'static str,
    pub intro: &'static str,
    pub location: &'static str,
    pub email: &'static str,
    pub portrait_url: &'static str,
    pub resume_url: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ExperienceItem {
    pub id: &'static str,
    pub role: &'static str,
    pub company: &'static str,
    pub period: &'static str,
    pub description: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct EducationItem {
    pub id: &'static str,
    pub school: &'static str,
    pub degree: &'static str,
    pub period: &'static str,
    pub description: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct Project {
    pub id: &'static str,
    pub title: &'static str,
    pub role: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    Award,
    Talk,
    Interview,
    Video,
    Book,
    Article,
}

#[derive(Debug, Clone, Copy)]
pub struct PressItem {
    pub title: &'static str,
    pub source: &'static str,
    pub description: &'static str,
    pub link: &'static str,
    pub kind: PressKind,
}

/// Proficiency score out of `full_mark`
#[derive(Debug, Clone, Copy)]
pub struct SkillMetric {
    pub subject: &'static str,
    pub score: u8,
    pub full_mark: u8,
}

pub const PROFILE: Profile = Profile {
    name: "Ryan Dumlao",
    monogram: "RD",
    kicker: "CREATIVE PRODUCT MANAGEMENT",
    headline: "GROUP PRODUCT MANAGER @ ADOBE",
    intro: "Hi! I'm Ryan, an electrical engineer turned product leader bridging the gap \
            between complex technical constraints and user-centric strategy.",
    location: "SAN FRANCISCO BAY AREA",
    email: "ryan.dumlao@gmail.com",
    portrait_url: "https://images.weserv.nl/?url=http://www.ryandumlao.com/img/profile.jpg&w=800&q=80&output=jpg",
    resume_url: "http://www.ryandumlao.com/rdumlao_resume.pdf",
};

pub const GREETING: &str = "👋 Hello! I'm Ryan's portfolio assistant.\n\n\
    🤖 I can help you learn more about his background.\n\n\
    ❓ Ask me anything!";

pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "Summarize his PM experience",
    "What technologies does he know?",
    "Tell me about Pokémon Abode",
    "How does he blend engineering & product?",
];

pub const EXPERIENCE: &[ExperienceItem] = &[
    ExperienceItem {
        id: "adobe",
        role: "Group Product Manager",
        company: "Adobe",
        period: "2018 — Present",
        description: &[
            "Group PM (2023-Present): Leading product strategy for Photoshop on Mobile (iOS, Android). Managing a team of PMs driving growth and retention.",
            "Senior PM (2021-2023): Spearheaded the launch of Camera Raw support and \"One-Tap\" actions on iPad, bringing desktop-class power to touch devices.",
            "Product Manager (2018-2021): Defined the MVP and long-term vision for Photoshop on iPad, navigating v1.0 launch challenges to eventual product-market fit.",
            "Key Achievements: 2025 Fast Company Innovation by Design Award winner, Adobe MAX Speaker, and cited in O'Reilly's \"Photoshop on the iPad\".",
        ],
    },
    ExperienceItem {
        id: "chownow",
        role: "Product Manager",
        company: "ChowNow",
        period: "2018",
        description: &[
            "Led product initiatives for the online ordering platform, focusing on restaurant partner retention and consumer conversion.",
            "Collaborated with engineering to optimize the \"Order Ahead\" checkout flow, reducing friction for hungry users.",
            "Defined requirements for restaurant-facing dashboard improvements.",
        ],
    },
    ExperienceItem {
        id: "juniper",
        role: "Product Manager, MBA Intern",
        company: "Juniper Networks",
        period: "2017",
        description: &[
            "Pioneered product strategy for public cloud (AWS, Azure, GCP).",
            "Developed use cases and joint integrations with cloud start-ups.",
            "Conducted market and customer analysis for new product lines.",
        ],
    },
    ExperienceItem {
        id: "telesign",
        role: "Associate Product Manager Intern",
        company: "TeleSign",
        period: "2017",
        description: &[
            "Established new product roadmap during strategy pivot.",
            "Substantiated underserved use cases through user interviews.",
            "Created bundled pricing model projecting $3M revenue opportunity.",
        ],
    },
    ExperienceItem {
        id: "medicines",
        role: "Senior Electrical Engineer",
        company: "The Medicines Company",
        period: "2013 — 2016",
        description: &[
            "Developed IONSYS™ fentanyl iontophoretic transdermal system.",
            "Completed regulatory efforts for US FDA and EU MAA approvals.",
            "Developed web and iOS/Android mobile apps for hospital sales tools.",
        ],
    },
    ExperienceItem {
        id: "raytheon",
        role: "Electrical Engineer II",
        company: "Raytheon",
        period: "2010 — 2013",
        description: &[
            "Engineering Rotation: Optical Engineer (VIIRS), Quality Manager, Finance.",
            "Designed Radar Special Test Equipment for F/A-18 & F-15.",
            "FPGA VXI Board Design Group.",
        ],
    },
    ExperienceItem {
        id: "spacemicro",
        role: "Electrical Engineer",
        company: "Space Micro Inc.",
        period: "2009 — 2010",
        description: &[
            "Designed radiation-hardened satellite communication systems.",
            "Performed thermal and vibration testing for flight hardware.",
            "Assisted in the development of TT&C (Telemetry, Tracking, and Command) transponders.",
        ],
    },
    ExperienceItem {
        id: "pokemon",
        role: "Founder & Lead Developer",
        company: "Pokémon Abode",
        period: "1999 — Present",
        description: &[
            "Founded one of the internet's largest and longest-running Pokémon fan communities.",
            "Designed and developed the full stack (LAMP) from scratch, managing high-traffic server infrastructure.",
            "Negotiated advertising partnerships and managed a distributed team of content creators.",
        ],
    },
];

pub const EDUCATION: &[EducationItem] = &[
    EducationItem {
        id: "anderson",
        school: "UCLA Anderson School of Management",
        degree: "Master of Business Administration (MBA)",
        period: "2016 — 2018",
        description: &[
            "Collins Family Fellow ($40k Merit Fellowship)",
            "Student Investment Fund Fellow",
            "Anderson Brand Management Chair",
            "VP Marketing, Asian Management Student Association",
        ],
    },
    EducationItem {
        id: "ucla",
        school: "UCLA",
        degree: "M.S. Electrical Engineering",
        period: "2008 — 2010",
        description: &[
            "Focus: Solid State & Photonics",
            "Research: Surface State Density in GaAs Nanopillars",
            "Teaching Assistant: Analog Circuit Design",
        ],
    },
    EducationItem {
        id: "ucsd",
        school: "UC San Diego",
        degree: "B.S. Electrical Engineering",
        period: "2004 — 2008",
        description: &["Focus: Photonics", "Minor: Japanese Studies", "Provost Honors"],
    },
];

pub const PROJECTS: &[Project] = &[
    Project {
        id: "ionsys",
        title: "IONSYS Web App",
        role: "Full Stack",
        description: "A responsive web application developed for The Medicines Company, used as a primary sales and educational tool for hospital representatives globally.",
        tags: &["JavaScript", "Responsive", "Sales Tool"],
    },
    Project {
        id: "abode",
        title: "Pokémon Abode",
        role: "Founder / Dev",
        description: "Founded and maintained one of the internet's largest Pokémon fansites. Managed community, content strategy, and server infrastructure.",
        tags: &["Web Dev", "Community", "Legacy"],
    },
    Project {
        id: "gaas",
        title: "GaAs Nanopillars",
        role: "Research",
        description: "Master's research on modeling the Surface State Density and Resistivity in n-doped GaAs nanopillars for potential optoelectronic applications.",
        tags: &["Research", "Physics", "Modeling"],
    },
    Project {
        id: "mach",
        title: "Mach Brothers Games",
        role: "Web Design",
        description: "Designed a responsive site for an indie game studio using SCSS/Sass. Focused on clean aesthetics and mobile compatibility.",
        tags: &["SCSS", "Responsive", "Gaming"],
    },
];

pub const PRESS: &[PressItem] = &[
    PressItem {
        title: "Innovation by Design 2025",
        source: "Fast Company",
        description: "Adobe recognized for design innovation under product leadership.",
        link: "https://www.fastcompany.com/91388791/adobe-innovation-by-design-2025",
        kind: PressKind::Award,
    },
    PressItem {
        title: "Photoshop in Your Pocket",
        source: "Adobe MAX 2025",
        description: "Speaker: Creating on iPhone and Android.",
        link: "https://www.adobe.com/max/2025/sessions/photoshop-in-your-pocket-creating-on-iphone-and-an-os322.html",
        kind: PressKind::Talk,
    },
    PressItem {
        title: "Interview: Pokémon Abode",
        source: "Johto Times",
        description: "Discussing the legacy of running one of the largest Pokémon communities.",
        link: "https://johto.substack.com/p/interview-with-pokemon-abode",
        kind: PressKind::Interview,
    },
    PressItem {
        title: "Photoshop Web Demo",
        source: "YouTube",
        description: "Official demo of Photoshop running in the browser.",
        link: "https://www.youtube.com/watch?v=G_f_1U1edBI",
        kind: PressKind::Video,
    },
    PressItem {
        title: "Adobe Live Feature Showcase",
        source: "YouTube",
        description: "Live demonstration of new creative workflows.",
        link: "https://www.youtube.com/watch?v=MDKplRRu0y4&t=6775s",
        kind: PressKind::Video,
    },
    PressItem {
        title: "Photoshop on the iPad Book",
        source: "O'Reilly Media",
        description: "Cited in the forward for product contributions.",
        link: "https://www.oreilly.com/library/view/photoshop-on-the/9780138213923/",
        kind: PressKind::Book,
    },
    PressItem {
        title: "Photoshop iPad Camera Raw",
        source: "The Verge",
        description: "Coverage of the launch of Camera Raw support on mobile.",
        link: "https://www.theverge.com/2021/10/12/22722122/adobe-photoshop-ipad-camera-raw-support-coming-soon",
        kind: PressKind::Article,
    },
    PressItem {
        title: "One-Tap Magic on iPad",
        source: "Adobe Blog",
        description: "Deep dive into new mobile-first features.",
        link: "https://blog.adobe.com/en/publish/2022/05/10/photoshop-on-the-ipad-brings-plenty-of-one-tap-magic-into-spring",
        kind: PressKind::Article,
    },
    PressItem {
        title: "Photoshop Web Announcement",
        source: "YouTube",
        description: "Showcasing the power of Photoshop on the web.",
        link: "https://www.youtube.com/watch?v=mvpN-8Ve3TU",
        kind: PressKind::Video,
    },
    PressItem {
        title: "Photoshop iPad Updates",
        source: "YouTube",
        description: "Review of key updates and features.",
        link: "https://www.youtube.com/watch?v=TR-CShNslf8",
        kind: PressKind::Video,
    },
];

pub const SKILLS_SUMMARY: &str = "My background is grounded in hardcore engineering (designing FPGAs, \
    optical systems, and circuit boards) but my passion lies in product development. I have \
    maintained my development skills (HTML5, CSS3, JS, Ruby on Rails) to adjust to the changing \
    web landscape while sharpening my business acumen through my MBA.";

pub const SKILLS: &[&str] = &[
    "Product Management",
    "HTML5 / CSS3 / JS",
    "Ruby on Rails",
    "C/C++ & VHDL",
    "Circuit Design",
    "Market Analysis",
];

pub const SKILL_METRICS: &[SkillMetric] = &[
    SkillMetric { subject: "Strategy", score: 90, full_mark: 100 },
    SkillMetric { subject: "Software", score: 85, full_mark: 100 },
    SkillMetric { subject: "Hardware", score: 95, full_mark: 100 },
    SkillMetric { subject: "Analytics", score: 80, full_mark: 100 },
    SkillMetric { subject: "Leadership", score: 85, full_mark: 100 },
    SkillMetric { subject: "Research", score: 75, full_mark: 100 },
];

pub const CONTACT_BLURB: &str = "Always open to discussing Product Management, Engineering, or \
    just trading travel stories. Check out my photography or drop me a line.";

/// System instruction sent with every assistant request
pub const RESUME_CONTEXT: &str = r#"
You are the professional AI Assistant for Ryan Dumlao, hosted on his personal portfolio website.
Your goal is to answer visitor questions about Ryan professionally, highlighting his unique blend of Engineering and Business expertise.

Here is Ryan's profile data based on his resume and background:

**Profile Summary**:
- **Current Role**: Group Product Manager at Adobe (Photoshop).
- **Background**: Electrical Engineer turned Product Manager. Bay Area native.
- **Fun Fact**: Formerly ran one of the internet's largest Pokémon websites ("Pokémon Abode") and recently interviewed about it in Johto Times.

**Education**:
- **UCLA Anderson School of Management**: MBA (2018). Fellowships: Collins Family Fellow, Student Investment Fund. Leadership: Anderson Brand Management Chair, VP Marketing (Asian Management Student Association).
- **UCLA**: MS in Electrical Engineering (Solid State & Photonics). Research on GaAs nanopillars.
- **UCSD**: BS in Electrical Engineering (Photonics), Minor in Japanese Studies.

**Work Experience**:
- **Adobe (2018-Present)**: Group Product Manager (2023-Present) leading Photoshop on Mobile (iOS, Android). Previously Senior PM (2021-2023) and PM (2018-2021). Led strategy for mobile ecosystems, launched Camera Raw support, and "One-Tap" actions.
- **ChowNow (2018)**: Product Manager. Focused on restaurant partner retention and consumer checkout optimization.
- **Juniper Networks (MBA Intern)**: Product Manager for Cloud Strategy (AWS/Azure/GCP).
- **TeleSign (MBA Intern)**: Associate Product Manager. Established roadmap for strategy pivot; created pricing model projecting $3M revenue.
- **The Medicines Company (Senior EE)**: Developed IONSYS™ fentanyl iontophoretic system. Managed FDA/EU regulatory approvals. Built web/mobile sales tools.
- **Raytheon (EE II)**: Engineering Rotation Program (Optical Engineer, Quality Manager, Financial Analyst). Worked on F/A-18 Radar and VIIRS.
- **Space Micro Inc. (2009-2010)**: Electrical Engineer. Designed radiation-hardened satellite communication systems and performed flight hardware testing.
- **Pokémon Abode (1999-Present)**: Founder & Lead Developer. Built and maintained a massive fan community, managing LAMP stack infrastructure and content teams.

**Key Skills**:
- **Technical**: HTML5, CSS3, JavaScript, jQuery, Ruby on Rails, C/C++, VHDL.
- **Hardware**: FPGAs, Optical Systems, Class 1000+ Cleanrooms, Oscilloscopes.
- **Product**: Market Analysis, Pricing Strategy, Regulatory Approval (FDA), Roadmap Development, Mobile/Web Product Strategy.

**Media & Recognition**:
- Speaker at Adobe MAX 2025 ("Photoshop in Your Pocket").
- Featured in Fast Company (Innovation by Design 2025).
- Featured in The Verge, Adobe Blog, and cited in O'Reilly's "Photoshop on the iPad" book.
- Interviewed by Johto Times regarding Pokémon Abode legacy.

Guidelines:
- **FORMATTING REQUIREMENT**: You must answer in a bulleted list format.
- **EMOJIS**: Start every bullet point with a relevant emoji.
- Keep answers concise, professional, and polite.
- If asked about "Pokemon", mention his experience running "Pokémon Abode" as a testament to his early web dev leadership.
- Focus on his transition from deep technical engineering (Raytheon/Medicines Co) to strategic product management (Adobe/Juniper).
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_in_page_order() {
        let sections = SectionId::all();
        assert_eq!(sections.first(), Some(&SectionId::Hero));
        assert_eq!(sections.last(), Some(&SectionId::Contact));
        assert_eq!(sections.len(), 8);
    }

    #[test]
    fn test_prompt_mentions_every_employer() {
        for item in EXPERIENCE {
            assert!(
                RESUME_CONTEXT.contains(item.company),
                "{} missing from system prompt",
                item.company
            );
        }
    }

    #[test]
    fn test_skill_scores_within_full_mark() {
        assert!(SKILL_METRICS.iter().all(|m| m.score <= m.full_mark));
    }
}
