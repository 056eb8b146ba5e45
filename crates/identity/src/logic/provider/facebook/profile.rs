use std::ops::Deref;

use serde::Serialize;
use shared::primitives::WrappedChronoDateTime;

use super::records::{FacebookEducation, FacebookObject, FacebookWork};
use crate::logic::converter::{Gender, ProfileEnum};
use crate::logic::profile::{AttributeValue, UserProfile};

pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const FIRST_NAME: &str = "first_name";
pub const MIDDLE_NAME: &str = "middle_name";
pub const LAST_NAME: &str = "last_name";
pub const GENDER: &str = "gender";
pub const LOCALE: &str = "locale";
pub const LANGUAGES: &str = "languages";
pub const LINK: &str = "link";
pub const USERNAME: &str = "username";
pub const THIRD_PARTY_ID: &str = "third_party_id";
pub const TIMEZONE: &str = "timezone";
pub const UPDATED_TIME: &str = "updated_time";
pub const VERIFIED: &str = "verified";
pub const BIO: &str = "bio";
pub const BIRTHDAY: &str = "birthday";
pub const EDUCATION: &str = "education";
pub const EMAIL: &str = "email";
pub const HOMETOWN: &str = "hometown";
pub const INTERESTED_IN: &str = "interested_in";
pub const LOCATION: &str = "location";
pub const POLITICAL: &str = "political";
pub const FAVORITE_ATHLETES: &str = "favorite_athletes";
pub const FAVORITE_TEAMS: &str = "favorite_teams";
pub const QUOTES: &str = "quotes";
pub const RELATIONSHIP_STATUS: &str = "relationship_status";
pub const RELIGION: &str = "religion";
pub const SIGNIFICANT_OTHER: &str = "significant_other";
pub const WEBSITE: &str = "website";
pub const WORK: &str = "work";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacebookRelationshipStatus {
    Single,
    InARelationship,
    Engaged,
    Married,
    ItsComplicated,
    InAnOpenRelationship,
    Widowed,
    Separated,
    Divorced,
    InACivilUnion,
    InADomesticPartnership,
}

impl ProfileEnum for FacebookRelationshipStatus {
    const KIND: &'static str = "facebook_relationship_status";
    const VARIANTS: &'static [Self] = &[
        FacebookRelationshipStatus::Single,
        FacebookRelationshipStatus::InARelationship,
        FacebookRelationshipStatus::Engaged,
        FacebookRelationshipStatus::Married,
        FacebookRelationshipStatus::ItsComplicated,
        FacebookRelationshipStatus::InAnOpenRelationship,
        FacebookRelationshipStatus::Widowed,
        FacebookRelationshipStatus::Separated,
        FacebookRelationshipStatus::Divorced,
        FacebookRelationshipStatus::InACivilUnion,
        FacebookRelationshipStatus::InADomesticPartnership,
    ];

    fn name(self) -> &'static str {
        match self {
            FacebookRelationshipStatus::Single => "single",
            FacebookRelationshipStatus::InARelationship => "in_a_relationship",
            FacebookRelationshipStatus::Engaged => "engaged",
            FacebookRelationshipStatus::Married => "married",
            FacebookRelationshipStatus::ItsComplicated => "its_complicated",
            FacebookRelationshipStatus::InAnOpenRelationship => "in_an_open_relationship",
            FacebookRelationshipStatus::Widowed => "widowed",
            FacebookRelationshipStatus::Separated => "separated",
            FacebookRelationshipStatus::Divorced => "divorced",
            FacebookRelationshipStatus::InACivilUnion => "in_a_civil_union",
            FacebookRelationshipStatus::InADomesticPartnership => "in_a_domestic_partnership",
        }
    }
}

/// Typed read access to a profile extracted from Facebook.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FacebookProfile(UserProfile);

impl Deref for FacebookProfile {
    type Target = UserProfile;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<FacebookProfile> for UserProfile {
    fn from(profile: FacebookProfile) -> Self {
        profile.0
    }
}

fn list_of<T>(value: &AttributeValue, item: impl Fn(&AttributeValue) -> Option<T>) -> Option<Vec<T>> {
    value
        .as_list()
        .map(|items| items.iter().filter_map(item).collect())
}

impl FacebookProfile {
    pub fn new(profile: UserProfile) -> Self {
        Self(profile)
    }

    pub fn into_inner(self) -> UserProfile {
        self.0
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(AttributeValue::as_str)
    }

    fn date(&self, key: &str) -> Option<WrappedChronoDateTime> {
        self.attribute(key).and_then(AttributeValue::as_date)
    }

    fn object(&self, key: &str) -> Option<FacebookObject> {
        self.attribute(key).and_then(FacebookObject::from_value)
    }

    fn objects(&self, key: &str) -> Option<Vec<FacebookObject>> {
        self.attribute(key)
            .and_then(|value| list_of(value, FacebookObject::from_value))
    }

    pub fn name(&self) -> Option<&str> {
        self.text(NAME)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.text(FIRST_NAME)
    }

    pub fn middle_name(&self) -> Option<&str> {
        self.text(MIDDLE_NAME)
    }

    pub fn last_name(&self) -> Option<&str> {
        self.text(LAST_NAME)
    }

    pub fn gender(&self) -> Option<Gender> {
        self.attribute(GENDER)
            .and_then(AttributeValue::as_enum::<Gender>)
    }

    /// `en-US` style tag
    pub fn locale(&self) -> Option<&str> {
        self.text(LOCALE)
    }

    pub fn languages(&self) -> Option<Vec<FacebookObject>> {
        self.objects(LANGUAGES)
    }

    pub fn link(&self) -> Option<&str> {
        self.text(LINK)
    }

    pub fn username(&self) -> Option<&str> {
        self.text(USERNAME)
    }

    pub fn third_party_id(&self) -> Option<&str> {
        self.text(THIRD_PARTY_ID)
    }

    /// Offset from UTC in hours; may be fractional.
    pub fn timezone(&self) -> Option<f64> {
        self.attribute(TIMEZONE).and_then(AttributeValue::as_f64)
    }

    pub fn updated_time(&self) -> Option<WrappedChronoDateTime> {
        self.date(UPDATED_TIME)
    }

    pub fn verified(&self) -> Option<bool> {
        self.attribute(VERIFIED).and_then(AttributeValue::as_bool)
    }

    pub fn bio(&self) -> Option<&str> {
        self.text(BIO)
    }

    pub fn birthday(&self) -> Option<WrappedChronoDateTime> {
        self.date(BIRTHDAY)
    }

    pub fn education(&self) -> Option<Vec<FacebookEducation>> {
        self.attribute(EDUCATION)
            .and_then(|value| list_of(value, FacebookEducation::from_value))
    }

    pub fn email(&self) -> Option<&str> {
        self.text(EMAIL)
    }

    pub fn hometown(&self) -> Option<FacebookObject> {
        self.object(HOMETOWN)
    }

    pub fn interested_in(&self) -> Option<Vec<String>> {
        self.attribute(INTERESTED_IN).and_then(|value| {
            list_of(value, |item| item.as_str().map(str::to_string))
        })
    }

    pub fn location(&self) -> Option<FacebookObject> {
        self.object(LOCATION)
    }

    pub fn political(&self) -> Option<&str> {
        self.text(POLITICAL)
    }

    pub fn favorite_athletes(&self) -> Option<Vec<FacebookObject>> {
        self.objects(FAVORITE_ATHLETES)
    }

    pub fn favorite_teams(&self) -> Option<Vec<FacebookObject>> {
        self.objects(FAVORITE_TEAMS)
    }

    pub fn quotes(&self) -> Option<&str> {
        self.text(QUOTES)
    }

    pub fn relationship_status(&self) -> Option<FacebookRelationshipStatus> {
        self.attribute(RELATIONSHIP_STATUS)
            .and_then(AttributeValue::as_enum::<FacebookRelationshipStatus>)
    }

    pub fn religion(&self) -> Option<&str> {
        self.text(RELIGION)
    }

    pub fn significant_other(&self) -> Option<FacebookObject> {
        self.object(SIGNIFICANT_OTHER)
    }

    pub fn website(&self) -> Option<&str> {
        self.text(WEBSITE)
    }

    pub fn work(&self) -> Option<Vec<FacebookWork>> {
        self.attribute(WORK)
            .and_then(|value| list_of(value, FacebookWork::from_value))
    }
}
