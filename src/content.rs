//! Static educational content shown on the home page.

pub struct Card {
    pub title: &'static str,
    pub content: &'static str,
}

pub struct Area {
    pub name: &'static str,
    pub frameworks: &'static [&'static str],
    pub description: &'static str,
}

pub struct Link {
    pub name: &'static str,
    pub url: &'static str,
}

pub struct SiteContent {
    pub site_title: &'static str,
    pub description: &'static str,
    pub about: Card,
    pub why_learn_title: &'static str,
    pub reasons: &'static [Card],
    pub usage_title: &'static str,
    pub areas: &'static [Area],
    pub getting_started_title: &'static str,
    pub steps: &'static [Card],
    pub resources_title: &'static str,
    pub links: &'static [Link],
}

pub static SITE: SiteContent = SiteContent {
    site_title: "Python - simply about the complex",
    description: "A thorough guide to the Python programming language",
    about: Card {
        title: "What is Python?",
        content: "Python is a high-level general-purpose programming language that combines \
                  ease of learning with powerful capabilities.",
    },
    why_learn_title: "Why learn Python?",
    reasons: &[
        Card {
            title: "Easy to learn",
            content: "Clean and readable syntax makes Python ideal for beginners.",
        },
        Card {
            title: "Versatile",
            content: "From web development to data analysis and artificial intelligence.",
        },
        Card {
            title: "Large community",
            content: "A huge amount of learning material and ready-made solutions.",
        },
    ],
    usage_title: "Where is Python used?",
    areas: &[
        Area {
            name: "Web development",
            frameworks: &["Django", "Flask", "FastAPI"],
            description: "Building websites and web applications",
        },
        Area {
            name: "Data science",
            frameworks: &["Pandas", "NumPy", "Matplotlib"],
            description: "Data analysis and visualisation",
        },
        Area {
            name: "Machine learning",
            frameworks: &["TensorFlow", "PyTorch", "scikit-learn"],
            description: "AI and neural networks",
        },
    ],
    getting_started_title: "Where to start?",
    steps: &[
        Card {
            title: "Install Python",
            content: "Download the latest release from python.org",
        },
        Card {
            title: "Pick an IDE",
            content: "PyCharm, VS Code or Jupyter Notebook to begin with",
        },
        Card {
            title: "First programs",
            content: "Start with small scripts and grow from there",
        },
    ],
    resources_title: "Useful resources",
    links: &[
        Link {
            name: "Official documentation",
            url: "https://docs.python.org/3/",
        },
        Link {
            name: "Real Python Tutorials",
            url: "https://realpython.com/",
        },
        Link {
            name: "Python for beginners",
            url: "https://pythonru.com/uroki",
        },
    ],
};
