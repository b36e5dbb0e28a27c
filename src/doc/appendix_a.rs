/*!
# Error Messages

Errors are reported as `?MESSAGE IN line [HERITAGE]` followed by any
detail, for example `?DIVISION BY ZERO IN 4 [BASIC]`. The heritage tells
you which of BASIC, PILOT or Logo was running the line.

Every error belongs to a category.

| Category | Meaning | The run |
|----------|---------|---------|
| `SyntaxError` | The line could not be parsed | continues |
| `RuntimeError` | The line failed while running | continues |
| `ResourceError` | Too many nested calls or loops, or the step limit | stops |
| `Cancelled` | CTRL-C or a cancelled input request | stops |

A `TRY` block catches syntax and runtime errors raised inside it,
including errors from `SUB` and `FUNCTION` calls. The message is stored
in `ERROR$` and in the variable named after `CATCH`.

An uncaught `THROW` ends the run with the message
`?UNHANDLED ERROR IN line [BASIC]; message`.

`ASSERT` failures are recorded but do not end the run.
*/
