//! Sample professionals shown on first run.

use chrono::Utc;
use smartfixer_shared::Category;

use crate::database::{Database, Table};
use crate::error::Result;
use crate::experts::insert_expert_row;
use crate::models::Expert;

struct Sample {
    name: &'static str,
    category: Category,
    phone: &'static str,
    email: &'static str,
    hourly_rate: f64,
    description: &'static str,
    availability: &'static str,
    rating: f64,
    years_experience: u32,
    certifications: &'static str,
    service_area: &'static str,
}

const SAMPLES: [Sample; 12] = [
    Sample {
        name: "Mike's Plumbing Services",
        category: Category::Plumbing,
        phone: "(555) 101-2001",
        email: "mike@mikesplumbing.com",
        hourly_rate: 85.0,
        description: "Full-service residential plumbing. Specializing in leak detection, pipe repair, and fixture installation.",
        availability: "Mon-Sat 7AM-6PM",
        rating: 4.8,
        years_experience: 15,
        certifications: "Licensed Master Plumber, EPA Lead-Safe Certified",
        service_area: "Metro area, 30-mile radius",
    },
    Sample {
        name: "Rodriguez Plumbing Co.",
        category: Category::Plumbing,
        phone: "(555) 101-2002",
        email: "info@rodriguezplumbing.com",
        hourly_rate: 75.0,
        description: "Family-owned plumbing business. Emergency services available 24/7 for burst pipes and sewage backups.",
        availability: "24/7 Emergency Available",
        rating: 4.6,
        years_experience: 22,
        certifications: "Licensed Plumber, Backflow Prevention Certified",
        service_area: "City and suburbs",
    },
    Sample {
        name: "BrightSpark Electric",
        category: Category::Electrical,
        phone: "(555) 201-3001",
        email: "service@brightspark.com",
        hourly_rate: 95.0,
        description: "Commercial and residential electrical work. Panel upgrades, EV charger installation, and smart home wiring.",
        availability: "Mon-Fri 8AM-5PM",
        rating: 4.9,
        years_experience: 12,
        certifications: "Licensed Electrician, NFPA 70E Certified",
        service_area: "Tri-county area",
    },
    Sample {
        name: "Sarah Chen Electric",
        category: Category::Electrical,
        phone: "(555) 201-3002",
        email: "sarah@chenelectric.com",
        hourly_rate: 90.0,
        description: "Specializing in residential rewiring, code compliance inspections, and lighting design.",
        availability: "Mon-Sat 8AM-6PM",
        rating: 4.7,
        years_experience: 10,
        certifications: "Master Electrician, OSHA 30 Certified",
        service_area: "Metro area",
    },
    Sample {
        name: "Cool Breeze HVAC",
        category: Category::Hvac,
        phone: "(555) 301-4001",
        email: "info@coolbreezehvac.com",
        hourly_rate: 100.0,
        description: "Complete HVAC solutions including installation, maintenance, and repair of heating and cooling systems.",
        availability: "Mon-Fri 7AM-7PM, Sat 8AM-2PM",
        rating: 4.8,
        years_experience: 18,
        certifications: "NATE Certified, EPA 608 Universal",
        service_area: "50-mile radius",
    },
    Sample {
        name: "Texas Climate Control",
        category: Category::Hvac,
        phone: "(555) 301-4002",
        email: "support@texasclimate.com",
        hourly_rate: 110.0,
        description: "High-efficiency system installations and ductwork. Free estimates on new system installs.",
        availability: "Mon-Sat 7AM-8PM",
        rating: 4.5,
        years_experience: 25,
        certifications: "NATE Certified, ACCA Member",
        service_area: "Greater metro area",
    },
    Sample {
        name: "Summit Roofing Pros",
        category: Category::Roofing,
        phone: "(555) 401-5001",
        email: "jobs@summitroofing.com",
        hourly_rate: 80.0,
        description: "Roof repair, replacement, and inspection. Experienced with shingle, tile, and metal roofing.",
        availability: "Mon-Fri 7AM-5PM",
        rating: 4.7,
        years_experience: 20,
        certifications: "GAF Certified Installer, OSHA 10",
        service_area: "City and surrounding counties",
    },
    Sample {
        name: "All Weather Roofing",
        category: Category::Roofing,
        phone: "(555) 401-5002",
        email: "info@allweatherroof.com",
        hourly_rate: 85.0,
        description: "Storm damage specialists. Insurance claim assistance and emergency tarping services.",
        availability: "Mon-Sat 6AM-6PM",
        rating: 4.6,
        years_experience: 14,
        certifications: "CertainTeed SELECT ShingleMaster, Licensed Roofer",
        service_area: "Regional, 40-mile radius",
    },
    Sample {
        name: "Jack of All Trades Handyman",
        category: Category::General,
        phone: "(555) 501-6001",
        email: "jack@jackalltrades.com",
        hourly_rate: 55.0,
        description: "General home repairs, furniture assembly, drywall patching, painting, and minor plumbing/electrical.",
        availability: "Mon-Sun 8AM-6PM",
        rating: 4.5,
        years_experience: 8,
        certifications: "Insured and Bonded",
        service_area: "Local metro area",
    },
    Sample {
        name: "HomeHelper Services",
        category: Category::General,
        phone: "(555) 501-6002",
        email: "hello@homehelper.com",
        hourly_rate: 60.0,
        description: "Reliable handyman services for all your home needs. Specializing in kitchen and bathroom updates.",
        availability: "Mon-Fri 9AM-5PM",
        rating: 4.4,
        years_experience: 6,
        certifications: "Insured, BBB A+ Rated",
        service_area: "City limits",
    },
    Sample {
        name: "QuickKey Locksmith",
        category: Category::Locksmith,
        phone: "(555) 601-7001",
        email: "dispatch@quickkey.com",
        hourly_rate: 70.0,
        description: "Residential and automotive locksmith. Lock rekeying, smart lock installation, and emergency lockout service.",
        availability: "24/7",
        rating: 4.6,
        years_experience: 11,
        certifications: "ALOA Certified, Licensed Locksmith",
        service_area: "Metro area, mobile service",
    },
    Sample {
        name: "SecureHome Locksmiths",
        category: Category::Locksmith,
        phone: "(555) 601-7002",
        email: "info@securehome.com",
        hourly_rate: 75.0,
        description: "Home security specialists. Lock upgrades, access control systems, and safe installation.",
        availability: "Mon-Sat 8AM-8PM, Emergency 24/7",
        rating: 4.7,
        years_experience: 16,
        certifications: "CML Certified Master Locksmith",
        service_area: "Tri-city area",
    },
];

/// The built-in directory entries, stamped with the current time.
pub fn sample_experts() -> Vec<Expert> {
    let now = Utc::now();
    SAMPLES
        .iter()
        .map(|s| Expert {
            id: None,
            name: s.name.to_string(),
            category: s.category.as_str().to_string(),
            phone: s.phone.to_string(),
            email: s.email.to_string(),
            hourly_rate: s.hourly_rate,
            description: s.description.to_string(),
            availability: s.availability.to_string(),
            rating: s.rating,
            years_experience: s.years_experience,
            certifications: s.certifications.to_string(),
            service_area: s.service_area.to_string(),
            created_at: now,
        })
        .collect()
}

impl Database {
    /// Insert the sample experts if the directory is empty.
    ///
    /// The count check and inserts share one transaction, so calling this
    /// repeatedly never duplicates rows. Returns how many rows were added.
    pub fn seed_sample_experts(&self) -> Result<usize> {
        let tx = self.conn().unchecked_transaction()?;

        let existing: i64 = tx.query_row("SELECT COUNT(*) FROM experts", [], |row| row.get(0))?;
        if existing > 0 {
            tracing::debug!(existing, "expert directory already populated, skipping seed");
            return Ok(0);
        }

        let samples = sample_experts();
        for expert in &samples {
            insert_expert_row(&tx, expert)?;
        }
        tx.commit()?;
        self.touch(Table::Experts);

        tracing::info!(inserted = samples.len(), "seeded sample experts");
        Ok(samples.len())
    }
}
