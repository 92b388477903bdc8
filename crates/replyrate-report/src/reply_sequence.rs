use crate::ticket::Reply;

/// One reply with its resolved responder role.
#[derive(Debug, Clone, Copy)]
pub struct SequencedReply<'a> {
    pub reply: &'a Reply,
    pub is_agent: bool,
}

/// Orders a ticket's replies chronologically and classifies each one exactly
/// once, so transcript rendering and metric computation always agree on the
/// responder role.
///
/// The sort is stable: replies sharing a key (including the empty key for
/// missing timestamps) keep their relative input order.
pub fn sequence(replies: &[Reply]) -> Vec<SequencedReply<'_>> {
    let mut ordered: Vec<&Reply> = replies.iter().collect();
    ordered.sort_by(|left, right| left.sort_key().cmp(right.sort_key()));
    ordered
        .into_iter()
        .map(|reply| SequencedReply {
            reply,
            is_agent: reply.is_agent(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::sequence;
    use crate::ticket::Reply;
    use serde_json::{from_value, json};

    fn reply(created_at: Option<&str>, text: &str, agent: bool) -> Reply {
        from_value(json!({
            "created_at": created_at,
            "content": {"text": text},
            "agent_responder": agent,
        }))
        .expect("deserialize reply")
    }

    #[test]
    fn unit_sequence_orders_replies_chronologically() {
        let replies = vec![
            reply(Some("2024-03-05T13:00:00Z"), "third", true),
            reply(Some("2024-03-05T11:00:00Z"), "first", false),
            reply(Some("2024-03-05T12:00:00Z"), "second", true),
        ];
        let ordered = sequence(&replies);
        let bodies: Vec<&str> = ordered.iter().map(|entry| entry.reply.body()).collect();
        assert_eq!(bodies, vec!["first", "second", "third"]);
    }

    #[test]
    fn functional_sequence_sorts_missing_timestamps_first_and_keeps_input_order() {
        let replies = vec![
            reply(Some("2024-03-05T11:00:00Z"), "dated", false),
            reply(None, "undated one", false),
            reply(None, "undated two", true),
        ];
        let ordered = sequence(&replies);
        let bodies: Vec<&str> = ordered.iter().map(|entry| entry.reply.body()).collect();
        assert_eq!(bodies, vec!["undated one", "undated two", "dated"]);
    }

    #[test]
    fn unit_sequence_classifies_each_reply_once_with_the_role_union() {
        let replies = vec![
            from_value::<Reply>(json!({
                "created_at": "2024-03-05T11:00:00Z",
                "replier": {"agent": true}
            }))
            .expect("deserialize"),
            reply(Some("2024-03-05T12:00:00Z"), "from customer", false),
        ];
        let ordered = sequence(&replies);
        assert!(ordered[0].is_agent);
        assert!(!ordered[1].is_agent);
        // The resolved role must match what the reply itself reports.
        for entry in &ordered {
            assert_eq!(entry.is_agent, entry.reply.is_agent());
        }
    }

    #[test]
    fn unit_sequence_of_no_replies_is_empty() {
        assert!(sequence(&[]).is_empty());
    }
}
