use serde::{Deserialize, Serialize};

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable subscription request.
/// Both fields are optional at this stage so that missing fields can be
/// reported with the route's own error kind instead of a generic body rejection.
#[derive(Deserialize, Debug)]
pub struct DeserSubscription {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "groupId", default)]
    pub group_id: Option<String>,
}

/// Subscription request with all the fields the route requires present.
#[derive(Debug)]
pub struct ValidSubscription {
    pub email: SubscriberEmail,
    pub group: GroupId,
}

/// Subscriber email. Deliberately permissive: the newsletter API is the
/// source of truth for validity, we only reject the empty string.
#[derive(Debug)]
pub struct SubscriberEmail(String);

/// Newsletter audience group identifier, either caller-supplied or taken
/// from server configuration depending on the route.
#[derive(Debug)]
pub struct GroupId(String);

/// Which side picks the audience group for a subscription.
#[derive(Debug, Clone, Copy)]
pub enum GroupSelect {
    /// The caller supplies `groupId` in the request body.
    FromCaller,
    /// The group is a server-side constant; the caller never chooses the audience.
    FromConfig,
}

// ###################################
// ->   IMPLS
// ###################################
impl GroupSelect {
    /// The route's full set of required fields, used verbatim in the
    /// `MISSING_FIELDS` message.
    pub fn required_fields(&self) -> &'static str {
        match self {
            GroupSelect::FromCaller => "email and groupId",
            GroupSelect::FromConfig => "email",
        }
    }
}

impl DeserSubscription {
    /// Checks the fields this route requires and resolves the group id.
    /// Any missing or empty required field is reported with the route's
    /// whole required set, mirroring what the caller has to send.
    pub fn into_valid(
        self,
        group_select: GroupSelect,
        config_group_id: &str,
    ) -> Result<ValidSubscription, DataParsingError> {
        let required = group_select.required_fields();

        let email = self
            .email
            .and_then(|email| SubscriberEmail::parse(email).ok())
            .ok_or(DataParsingError::MissingFields(required))?;

        let group = match group_select {
            GroupSelect::FromCaller => self
                .group_id
                .and_then(|group_id| GroupId::parse(group_id).ok())
                .ok_or(DataParsingError::MissingFields(required))?,
            GroupSelect::FromConfig => GroupId::parse(config_group_id)
                .map_err(|_| DataParsingError::MissingFields(required))?,
        };

        Ok(ValidSubscription { email, group })
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SubscriberEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(DataParsingError::EmailEmpty);
        }

        Ok(SubscriberEmail(value.to_owned()))
    }
}

impl AsRef<str> for GroupId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl GroupId {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(DataParsingError::GroupIdEmpty);
        }

        Ok(GroupId(value.to_owned()))
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, Serialize, thiserror::Error)]
pub enum DataParsingError {
    #[error("{0} required")]
    MissingFields(&'static str),

    #[error("email must not be empty")]
    EmailEmpty,
    #[error("group id must not be empty")]
    GroupIdEmpty,
}
