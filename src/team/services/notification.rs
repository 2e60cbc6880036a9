//! Message builders for invitation and response notifications.

use crate::team::{
    domain::{EmailAddress, EventId, MembershipStatus, Team},
    ports::{Notification, NotifierError, NotifierResult},
};
use minijinja::{AutoEscape, Environment, Value, context};

const INVITATION_TEMPLATE: &str = "\
<p>Hello,</p>\
<p>{{ inviter }} invited you to join team <strong>{{ team }}</strong>.</p>\
<p><a href=\"{{ link }}\">Open the event</a> to accept or reject the invitation.</p>";

const RESPONSE_TEMPLATE: &str = "\
<p>Hello,</p>\
<p>{{ invitee }} {{ status | lower }} your invitation to join team <strong>{{ team }}</strong>.</p>";

/// Builds the deep link to an event page.
#[must_use]
pub fn event_link(app_url: &str, event_id: EventId) -> String {
    format!("{app_url}events/{event_id}")
}

/// Builds the batch invitation sent to every successfully invited user.
///
/// # Errors
///
/// Returns [`NotifierError::Render`] if the template fails to render.
pub fn invitation(
    inviter: &EmailAddress,
    recipients: Vec<String>,
    team: &Team,
    app_url: &str,
) -> NotifierResult<Notification> {
    let link = event_link(app_url, team.event_id());
    let body = render(
        INVITATION_TEMPLATE,
        context! {
            inviter => inviter.as_str(),
            team => team.name().as_str(),
            link => Value::from_safe_string(link),
        },
    )?;
    Ok(Notification {
        from: inviter.as_str().to_owned(),
        to: recipients,
        subject: format!("Invitation to join {}", team.name()),
        body,
    })
}

/// Builds the message telling an inviter how their invitation was answered.
///
/// # Errors
///
/// Returns [`NotifierError::Render`] if the template fails to render.
pub fn response(
    responder: &EmailAddress,
    inviter: &EmailAddress,
    status: MembershipStatus,
    team: &Team,
) -> NotifierResult<Notification> {
    let body = render(
        RESPONSE_TEMPLATE,
        context! {
            invitee => responder.as_str(),
            status => status.as_str(),
            team => team.name().as_str(),
        },
    )?;
    Ok(Notification {
        from: responder.as_str().to_owned(),
        to: vec![inviter.as_str().to_owned()],
        subject: format!("Invitation {status} by {responder}"),
        body,
    })
}

fn render(template: &str, values: Value) -> NotifierResult<String> {
    let mut environment = Environment::new();
    environment.set_auto_escape_callback(|_| AutoEscape::Html);
    environment
        .render_str(template, values)
        .map_err(|error| NotifierError::Render(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::domain::{TeamDetails, UserId};
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    #[fixture]
    fn team() -> Team {
        let details = TeamDetails::new("Crab <Rave>", "", "").expect("valid details");
        Team::new(EventId::new(), UserId::new(), details, &DefaultClock)
    }

    fn email(value: &str) -> EmailAddress {
        EmailAddress::new(value).expect("valid email")
    }

    #[rstest]
    fn invitation_links_to_event_and_escapes_team_name(team: Team) {
        let recipients = vec!["b@x.com".to_owned(), "c@x.com".to_owned()];
        let message = invitation(
            &email("lead@x.com"),
            recipients.clone(),
            &team,
            "https://junction.example/",
        )
        .expect("render should succeed");

        assert_eq!(message.from, "lead@x.com");
        assert_eq!(message.to, recipients);
        assert_eq!(message.subject, "Invitation to join Crab <Rave>");
        let expected_link = format!("https://junction.example/events/{}", team.event_id());
        assert!(message.body.contains(&expected_link));
        assert!(message.body.contains("Crab &lt;Rave&gt;"));
    }

    #[rstest]
    #[case(MembershipStatus::Accepted, "accepted")]
    #[case(MembershipStatus::Rejected, "rejected")]
    fn response_goes_to_inviter(
        team: Team,
        #[case] status: MembershipStatus,
        #[case] verb: &str,
    ) {
        let message = response(&email("b@x.com"), &email("lead@x.com"), status, &team)
            .expect("render should succeed");

        assert_eq!(message.to, vec!["lead@x.com".to_owned()]);
        assert_eq!(message.subject, format!("Invitation {status} by b@x.com"));
        assert!(message.body.contains(&format!("b@x.com {verb} your invitation")));
    }
}
